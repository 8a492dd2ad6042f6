//! Small layout helpers shared by the screens.

use iced::widget::{row, text};
use iced::{Alignment, Element, Length};

const LABEL_WIDTH: f32 = 140.0;

pub fn form_row<'a, Message: 'a>(
    label: &'a str,
    control: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    row![
        text(label).width(Length::Fixed(LABEL_WIDTH)),
        control.into(),
    ]
    .spacing(12)
    .align_items(Alignment::Center)
    .into()
}

/// Label and right-aligned value, used for the balances panel.
pub fn labeled_value<'a, Message: 'a>(label: &'a str, value: String) -> Element<'a, Message> {
    row![
        text(label).width(Length::Fill),
        text(value).size(14),
    ]
    .spacing(12)
    .align_items(Alignment::Center)
    .into()
}
