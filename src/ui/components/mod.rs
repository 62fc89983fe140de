pub mod action_modal;
pub mod input_bar;
pub mod login_card;
pub mod message_list;
pub mod notifications_panel;
pub mod payment_modal;
pub mod waveform;

pub use action_modal::{ActionModal, ActionModalChoice};
pub use input_bar::InputBar;
pub use login_card::LoginCard;
pub use message_list::{MessageList, MessageListActions};
pub use notifications_panel::{NotificationActions, NotificationsPanel};
pub use payment_modal::{PaymentChoice, PaymentModal};
pub use waveform::Waveform;
