//! Wire constants for the SMART Web Messaging channel.

/// Tags engine-originated envelopes among possibly-shared transport traffic.
pub const MESSAGING_HANDLE: &str = "smart-web-messaging";

/// Liveness probe sent during the startup handshake.
pub const STATUS_HANDSHAKE: &str = "status.handshake";
/// Form submission request, awaiting acknowledgment from the host.
pub const FORM_SUBMITTED: &str = "form.submitted";

/// Host pushes configuration; accepted with no visible state change here.
pub const SDC_CONFIGURE: &str = "sdc.configure";
/// Host updates the launch context; merged into the held context.
pub const SDC_CONFIGURE_CONTEXT: &str = "sdc.configureContext";
/// Host asks for a questionnaire to be displayed.
pub const SDC_DISPLAY_QUESTIONNAIRE: &str = "sdc.displayQuestionnaire";
/// Host asks the form to submit itself.
pub const UI_FORM_REQUEST_SUBMIT: &str = "ui.form.requestSubmit";
/// Host asks for a save; a no-op at this layer.
pub const UI_FORM_PERSIST: &str = "ui.form.persist";
