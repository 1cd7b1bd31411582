//! Occupations questionnaire - regular-question form in the terminal
//!
//! Every question is visible at once; the answers are accepted by an
//! offline submitter and printed as they would be posted.

use percept::RegularForm;
use percept_demo::{LoggingSubmitter, occupations_form};
use percept_ratatui_form::{RatatuiForm, Theme};
use ratatui::style::Color;

fn main() -> anyhow::Result<()> {
    let theme = Theme {
        primary: Color::LightRed,
        secondary: Color::Red,
        selected_bg: Color::DarkGray,
        ..Theme::default()
    };

    let submitter = LoggingSubmitter::new().with_next_step("/");
    let mut form = RegularForm::new(occupations_form(), submitter)?;
    let next_step = RatatuiForm::new()
        .with_title("A few questions about you")
        .with_theme(theme)
        .run(&mut form)?;

    for (url, body) in form.submitter().received() {
        println!("POST {url}\n{body}");
    }
    println!("next: {next_step:?}");
    Ok(())
}
