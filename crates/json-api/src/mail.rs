//! Background mail delivery.

use std::sync::Arc;

use tracing::{Instrument as _, error};

use dialed_in_app::mailer::{Mailer, Message};

/// Send `message` without holding up the response. Failures are logged only.
pub(crate) fn deliver_in_background(mailer: Arc<dyn Mailer>, recipient: String, message: Message) {
    let template = message.template();

    tokio::spawn(
        async move {
            if let Err(source) = mailer.send(&recipient, message).await {
                error!(template, "failed to deliver mail: {source}");
            }
        }
        .in_current_span(),
    );
}
