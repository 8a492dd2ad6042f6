//! Inline failure display with an optional retry control.

use iced::widget::{button, column, container, row, text};
use iced::{theme, Alignment, Element, Length};

use crate::ui::error_map::ErrorDescription;

/// A failure in the shape screens keep it: a short summary for the user and
/// the underlying cause for the detail line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestFailure {
    pub summary: String,
    pub detail: Option<String>,
}

impl RequestFailure {
    pub fn new(summary: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            summary: summary.into(),
            detail,
        }
    }
}

impl From<ErrorDescription> for RequestFailure {
    fn from(description: ErrorDescription) -> Self {
        Self {
            summary: description.headline,
            detail: description.technical,
        }
    }
}

pub fn error_banner<'a, Message: Clone + 'a>(
    failure: &'a RequestFailure,
    on_retry: Option<Message>,
) -> Element<'a, Message> {
    let mut lines = column![text(&failure.summary)].spacing(4);
    if let Some(detail) = &failure.detail {
        lines = lines.push(text(detail).size(12));
    }

    let mut content = row![lines.width(Length::Fill)]
        .spacing(12)
        .align_items(Alignment::Center);
    if let Some(message) = on_retry {
        content = content.push(
            button(text("Retry").size(14))
                .style(theme::Button::Secondary)
                .on_press(message),
        );
    }

    container(content)
        .padding([8, 12])
        .width(Length::Fill)
        .style(theme::Container::Box)
        .into()
}
