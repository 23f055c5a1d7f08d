#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Queue a serialized scan request for the scan service.
    SendRequest { payload: String },
}
