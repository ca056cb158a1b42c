pub mod classify;
pub mod error;
pub mod report;
pub mod request;
pub mod response;

pub use classify::{classify, FormatVerdict};
pub use error::{HeaderField, InspectError, Result};
pub use report::{inspect, Diagnostic, Inspection, UnknownReport};
pub use request::{
    parse_request, RequestHeader, RequestReport, ResolvedToken, StringTable, StringTableEntry,
};
pub use response::{parse_response, DecodedBody, ResponseEnvelope, ResponseReport, Status};
