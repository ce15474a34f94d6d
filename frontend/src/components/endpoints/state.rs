use super::form::EndpointForm;
use common::model::endpoint::EndpointDescriptor;
use common::model::remote::{RemoteResponses, RemoteResult};

pub struct EndpointsPanel {
    pub endpoints: Vec<EndpointDescriptor>,
    /// Outcome of the last fetch-all, by endpoint name.
    pub responses: RemoteResponses,
    pub form: EndpointForm,
    /// Id of the descriptor being edited; `None` while adding.
    pub editing_id: Option<String>,
    /// Validation messages for the form.
    pub errors: Vec<String>,
    /// Answer to the last "Test" of the form.
    pub test_result: Option<RemoteResult>,
    pub busy: bool,
    pub loaded: bool,
}

impl EndpointsPanel {
    pub fn new() -> Self {
        Self {
            endpoints: Vec::new(),
            responses: RemoteResponses::new(),
            form: EndpointForm::default(),
            editing_id: None,
            errors: Vec::new(),
            test_result: None,
            busy: false,
            loaded: false,
        }
    }

    pub fn reset_form(&mut self) {
        self.form = EndpointForm::default();
        self.editing_id = None;
        self.errors.clear();
        self.test_result = None;
    }
}
