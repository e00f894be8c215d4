use log::debug;
use serde_json::{Map, Value};

/// The UI collaborator port.
///
/// Host-initiated messages that concern the visual form component are
/// forwarded through this trait; the component's attribute-setting API and
/// DOM lifecycle stay on the other side of it.
pub trait FormDelegate: Send + 'static {
    /// The host's launch context changed. `launch_context` maps context names
    /// (`patient`, `encounter`, …) to their resources.
    fn apply_launch_context(&mut self, launch_context: &Map<String, Value>);

    /// The host asked for a questionnaire to be displayed, optionally with a
    /// pre-filled response.
    fn display_questionnaire(
        &mut self,
        questionnaire: Value,
        initial_response: Option<Value>,
        launch_context: &Map<String, Value>,
    );

    /// The host asked the form to submit itself.
    fn request_submit(&mut self);
}

/// Delegate for bridges running without a form component attached. Host
/// messages are still acknowledged; the forwarded content goes nowhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFormDelegate;

impl FormDelegate for NullFormDelegate {
    fn apply_launch_context(&mut self, _launch_context: &Map<String, Value>) {}

    fn display_questionnaire(
        &mut self,
        _questionnaire: Value,
        _initial_response: Option<Value>,
        _launch_context: &Map<String, Value>,
    ) {
        debug!("No form component attached. Questionnaire dropped.");
    }

    fn request_submit(&mut self) {}
}
