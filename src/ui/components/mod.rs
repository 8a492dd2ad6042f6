//! Widgets shared between the screens.

mod error_banner;
mod form_row;
mod modal;
mod toast;

pub use error_banner::{error_banner, RequestFailure};
pub use form_row::{form_row, labeled_value};
pub use modal::modal_card;
pub use toast::{toast_stack, Toast, ToastKind, ToastSlot, ToastTray};
