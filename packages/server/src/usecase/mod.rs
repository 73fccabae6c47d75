//! UseCase 層
//!
//! 1 つの操作につき 1 つのユースケース。全ての状態遷移は Stage のガードの上で行い、
//! ガードを保持したまま結果のイベントを送信キューに積みます。

mod authenticate;
mod connect_participant;
mod delete_chat;
mod disconnect_participant;
mod dispatch;
pub mod error;
mod get_stream_status;
mod join_viewer;
mod post_chat;
mod start_stream;
mod stop_stream;
mod viewer_ready;

#[cfg(test)]
pub(crate) mod testing;

pub use authenticate::{LoginUseCase, VerifyTokenUseCase};
pub use connect_participant::ConnectParticipantUseCase;
pub use delete_chat::DeleteChatUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    ConnectError, DeleteChatError, JoinError, LoginError, StartStreamError, VerifyTokenError,
};
pub use get_stream_status::{GetStageSnapshotUseCase, GetStreamStatusUseCase};
pub use join_viewer::JoinViewerUseCase;
pub use post_chat::PostChatUseCase;
pub use start_stream::StartStreamUseCase;
pub use stop_stream::StopStreamUseCase;
pub use viewer_ready::ViewerReadyUseCase;
