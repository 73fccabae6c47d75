//! Stage の状態遷移が返した Delivery を MessagePusher に流す

use crate::domain::{Audience, Delivery, MessagePusher, Stage};

/// Delivery を順番に送信キューへ積む
///
/// 呼び出し側は Stage のガードを保持したまま呼ぶこと。
/// `Audience::All` はこの時点で接続中の全参加者に解決される。
pub(super) async fn dispatch(
    stage: &Stage,
    message_pusher: &dyn MessagePusher,
    deliveries: Vec<Delivery>,
) {
    for delivery in deliveries {
        let result = match &delivery.audience {
            Audience::All => {
                message_pusher
                    .broadcast(stage.connection_ids(), &delivery.event)
                    .await
            }
            Audience::One(target) => message_pusher.push_to(target, &delivery.event).await,
        };
        if let Err(e) = result {
            tracing::warn!("Failed to deliver {:?}: {}", delivery.audience, e);
        }
    }
}
