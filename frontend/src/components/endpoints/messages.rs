use super::form::Field;
use common::model::endpoint::EndpointDescriptor;
use common::model::remote::{RemoteResponses, RemoteResult};

pub enum Msg {
    Loaded(Result<(Vec<EndpointDescriptor>, RemoteResponses), String>),
    SetField(Field, String),
    Edit(String),
    ResetForm,
    Submit,
    Saved(Result<EndpointDescriptor, String>),
    Delete(String),
    Deleted(String, Result<(), String>),
    Test,
    Tested(Result<RemoteResult, String>),
    FetchAll,
    Fetched(Result<RemoteResponses, String>),
}
