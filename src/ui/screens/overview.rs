//! Returning-user screen: a mood check-in, the balances panel, and the
//! entry point into the actions modal.

use std::ops::RangeInclusive;

use iced::widget::{button, column, container, row, slider, text};
use iced::{theme, Alignment, Element, Length};

use crate::amount::format_wei;
use crate::position::OnChainPosition;
use crate::ui::components::labeled_value;
use crate::ui::messages::Message;

use super::short_address;

pub const MOOD_RANGE: RangeInclusive<u8> = 1..=5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverviewState {
    mood: u8,
}

impl Default for OverviewState {
    fn default() -> Self {
        Self { mood: 3 }
    }
}

impl OverviewState {
    pub fn mood(&self) -> u8 {
        self.mood
    }

    pub fn set_mood(&mut self, mood: u8) {
        if MOOD_RANGE.contains(&mood) {
            self.mood = mood;
        }
    }

    pub fn mood_label(&self) -> &'static str {
        match self.mood {
            1 => "Excited",
            2 => "Happy",
            4 => "Sad",
            5 => "Anxious",
            _ => "Neutral",
        }
    }

    fn mood_face(&self) -> &'static str {
        match self.mood {
            1 => "(≧▽≦)",
            2 => "(^‿^)",
            4 => "(._.)",
            5 => "(>_<)",
            _ => "(•_•)",
        }
    }

    pub fn view<'a>(
        &self,
        position: &OnChainPosition,
        address: &str,
        actions_enabled: bool,
    ) -> Element<'a, Message> {
        let header = column![
            text("Welcome back").size(24),
            text(short_address(address)).size(12),
        ]
        .spacing(4)
        .align_items(Alignment::Center);

        let mood = column![
            text(self.mood_face()).size(48),
            text("How do you feel about your position?").size(14),
            row![
                slider(MOOD_RANGE, self.mood, Message::MoodChanged).width(Length::Fixed(180.0)),
                text(self.mood_label()).size(14),
            ]
            .spacing(12)
            .align_items(Alignment::Center),
        ]
        .spacing(8)
        .align_items(Alignment::Center);

        let balances = container(
            column![
                labeled_value("ETH balance", format_wei(position.eth_wei, 4)),
                labeled_value("ChUSD balance", format_wei(position.token_wei, 2)),
                labeled_value("Deposited collateral", format_wei(position.deposited_wei, 4)),
                labeled_value("Minted debt", format_wei(position.minted_wei, 2)),
            ]
            .spacing(8),
        )
        .padding(16)
        .width(Length::Fixed(320.0))
        .style(theme::Container::Box);

        let actions = button(text("Manage position"))
            .style(theme::Button::Primary)
            .on_press_maybe(actions_enabled.then_some(Message::ActionsModalRequested));

        container(
            column![header, mood, balances, actions]
                .spacing(20)
                .align_items(Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_defaults_to_neutral() {
        let state = OverviewState::default();
        assert_eq!(state.mood(), 3);
        assert_eq!(state.mood_label(), "Neutral");
    }

    #[test]
    fn mood_stays_inside_the_scale() {
        let mut state = OverviewState::default();
        state.set_mood(1);
        assert_eq!(state.mood_label(), "Excited");
        state.set_mood(5);
        assert_eq!(state.mood_label(), "Anxious");
        state.set_mood(0);
        assert_eq!(state.mood(), 5);
        state.set_mood(9);
        assert_eq!(state.mood(), 5);
    }
}
