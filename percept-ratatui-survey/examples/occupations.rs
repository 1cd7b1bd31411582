//! Occupations - pairwise image survey in the terminal
//!
//! Runs the occupations study against generated portraits, so no server is
//! needed. Answers are printed once the survey ends.

use std::time::Duration;

use percept_demo::{AnswerTimer, GeneratedImageLoader, LoggingSubmitter, occupations_survey};
use percept_ratatui_survey::{RatatuiSurvey, Theme};
use ratatui::style::Color;

fn main() -> anyhow::Result<()> {
    let config = occupations_survey(&mut rand::thread_rng(), AnswerTimer::Random);

    let theme = Theme {
        primary: Color::LightRed,
        highlight: Color::Yellow,
        ..Theme::default()
    };
    let frontend = RatatuiSurvey::new()
        .with_title("PictoPercept - Occupations")
        .with_theme(theme);

    let loader = GeneratedImageLoader::new().with_latency(Duration::from_millis(150));
    let submitter = LoggingSubmitter::new().with_next_step("/survey/occupations/questions");

    let exit = frontend.run(config, loader, submitter)?;

    println!("{}", serde_json::to_string_pretty(&exit.answers)?);
    println!("outcome: {:?}", exit.outcome);
    println!("next: {:?}", exit.navigated_to);
    Ok(())
}
