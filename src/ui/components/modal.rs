//! Centered card layout used while a dialog replaces the active screen.

use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{theme, Alignment, Element, Length};

/// Wraps `body` in a modal card. The close control is disabled when
/// `on_close` is `None`, which screens use while a submission is in flight.
pub fn modal_card<'a, Message: Clone + 'a>(
    title: &'a str,
    on_close: Option<Message>,
    body: Element<'a, Message>,
) -> Element<'a, Message> {
    let header = row![
        text(title).size(20),
        horizontal_space(),
        button(text("×").size(16))
            .style(theme::Button::Text)
            .on_press_maybe(on_close),
    ]
    .spacing(12)
    .align_items(Alignment::Center);

    let card = container(column![header, body].spacing(16))
        .padding(20)
        .max_width(420)
        .style(theme::Container::Box);

    container(card)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .padding(24)
        .into()
}
