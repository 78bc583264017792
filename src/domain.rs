// Domain layer modules
pub mod inbound_record;
pub mod record_id;
pub mod redcap_request;
pub mod redcap_response;
pub mod relay_result;

// Re-exports
pub use inbound_record::{InboundRecord, InboundRecordError};
pub use record_id::RecordId;
pub use redcap_request::{FileUploadParameters, ImportParameters};
pub use redcap_response::{AutoIdParseError, ImportResponse};
pub use relay_result::{ProxyResponse, RelayResult, ACCESS_CONTROL_ALLOW_ORIGIN};
