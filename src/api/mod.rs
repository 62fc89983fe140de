pub mod client;
pub mod pipeline;
pub mod types;

pub use client::{mime_for_file, validate_id_photo, ApiClient, MAX_UPLOAD_BYTES};
pub use pipeline::{ApiCommand, ApiEvent, ApiOp, ApiPipeline};
pub use types::{
    ChargeRequest, ChargeResponse, ChatResponse, ConfirmActionRequest, ConfirmActionResponse,
    LoginResponse, Notification, NotificationChannel, PaymentCard, ProposedAction,
    UploadMediaResponse, DEFAULT_CURRENCY,
};
