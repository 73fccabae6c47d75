//! Server state.

use std::sync::Arc;

use yagura_shared::time::Clock;

use crate::{
    domain::{BroadcasterAuthenticator, MessagePusher, StageRepository},
    usecase::{
        ConnectParticipantUseCase, DeleteChatUseCase, DisconnectParticipantUseCase,
        GetStageSnapshotUseCase, GetStreamStatusUseCase, JoinViewerUseCase, LoginUseCase,
        PostChatUseCase, StartStreamUseCase, StopStreamUseCase, VerifyTokenUseCase,
        ViewerReadyUseCase,
    },
};

/// Shared application state
///
/// ハンドラーはユースケースだけに依存し、Repository や MessagePusher には直接触れない。
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub start_stream_usecase: Arc<StartStreamUseCase>,
    pub stop_stream_usecase: Arc<StopStreamUseCase>,
    pub join_viewer_usecase: Arc<JoinViewerUseCase>,
    pub viewer_ready_usecase: Arc<ViewerReadyUseCase>,
    pub post_chat_usecase: Arc<PostChatUseCase>,
    pub delete_chat_usecase: Arc<DeleteChatUseCase>,
    pub get_stream_status_usecase: Arc<GetStreamStatusUseCase>,
    pub get_stage_snapshot_usecase: Arc<GetStageSnapshotUseCase>,
    pub login_usecase: Arc<LoginUseCase>,
    pub verify_token_usecase: Arc<VerifyTokenUseCase>,
}

impl AppState {
    /// 依存関係（Repository, MessagePusher, 認証器, 時計）から全てのユースケースを組み立てる
    pub fn new(
        repository: Arc<dyn StageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        authenticator: Arc<dyn BroadcasterAuthenticator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            start_stream_usecase: Arc::new(StartStreamUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            stop_stream_usecase: Arc::new(StopStreamUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            join_viewer_usecase: Arc::new(JoinViewerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            viewer_ready_usecase: Arc::new(ViewerReadyUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            post_chat_usecase: Arc::new(PostChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            )),
            delete_chat_usecase: Arc::new(DeleteChatUseCase::new(
                repository.clone(),
                message_pusher,
            )),
            get_stream_status_usecase: Arc::new(GetStreamStatusUseCase::new(repository.clone())),
            get_stage_snapshot_usecase: Arc::new(GetStageSnapshotUseCase::new(repository)),
            login_usecase: Arc::new(LoginUseCase::new(authenticator.clone())),
            verify_token_usecase: Arc::new(VerifyTokenUseCase::new(authenticator)),
        }
    }
}
