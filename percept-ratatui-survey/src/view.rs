//! Survey view state rendered by the terminal frontend.

use image::DynamicImage;
use percept::{LoadedImage, Modal, SurveyAction, SurveyView, TimeBarState};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

/// One revealed image and its decoded pixels, if they could be decoded.
#[derive(Debug, Clone)]
pub struct ShownImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    picture: Option<DynamicImage>,
}

impl ShownImage {
    fn new(image: &LoadedImage) -> Self {
        let picture = match image::load_from_memory(&image.bytes) {
            Ok(picture) => Some(picture),
            Err(e) => {
                tracing::debug!(url = %image.url, error = %e, "no preview");
                None
            }
        };
        Self {
            url: image.url.clone(),
            width: image.width,
            height: image.height,
            picture,
        }
    }

    /// Half-block preview fitting in `columns` x `rows` cells.
    pub fn preview(&self, columns: u16, rows: u16) -> Option<Vec<Line<'static>>> {
        let picture = self.picture.as_ref()?;
        if columns == 0 || rows == 0 {
            return None;
        }
        let thumb = picture
            .thumbnail(u32::from(columns), u32::from(rows) * 2)
            .to_rgb8();
        let (width, height) = thumb.dimensions();

        let lines = (0..height)
            .step_by(2)
            .map(|y| {
                let spans: Vec<Span<'static>> = (0..width)
                    .map(|x| {
                        let top = *thumb.get_pixel(x, y);
                        let bottom = if y + 1 < height {
                            *thumb.get_pixel(x, y + 1)
                        } else {
                            top
                        };
                        Span::styled(
                            "▀",
                            Style::default()
                                .fg(Color::Rgb(top[0], top[1], top[2]))
                                .bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
                        )
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        Some(lines)
    }
}

/// A [`SurveyView`] that keeps what the terminal should show.
#[derive(Debug, Default)]
pub struct TerminalView {
    pub(crate) question: String,
    pub(crate) images: Option<(ShownImage, ShownImage)>,
    pub(crate) loading: bool,
    pub(crate) time_bar: Option<TimeBarState>,
    pub(crate) modals: Vec<Modal<SurveyAction>>,
    pub(crate) modal_selected: usize,
    pub(crate) highlighted: usize,
    pub(crate) confirm_leave: bool,
    pub(crate) end_message: Option<String>,
    pub(crate) done: bool,
    pub(crate) navigated_to: Option<String>,
    pub(crate) unload_guard: Option<String>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn navigated_to(&self) -> Option<&str> {
        self.navigated_to.as_deref()
    }

    /// The modal drawn on top, which receives key presses.
    pub fn top_modal(&self) -> Option<&Modal<SurveyAction>> {
        self.modals.last()
    }
}

impl SurveyView for TerminalView {
    fn set_question(&mut self, text: &str) {
        self.question = text.to_string();
    }

    fn clear_images(&mut self) {
        self.images = None;
    }

    fn show_images(&mut self, left: &LoadedImage, right: &LoadedImage) {
        self.images = Some((ShownImage::new(left), ShownImage::new(right)));
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn render_time_bar(&mut self, state: &TimeBarState) {
        self.time_bar = Some(state.clone());
    }

    fn remove_time_bar(&mut self) {
        self.time_bar = None;
    }

    fn open_modal(&mut self, modal: Modal<SurveyAction>) {
        self.modals.push(modal);
        self.modal_selected = 0;
    }

    fn close_modal(&mut self) {
        if !self.modals.is_empty() {
            self.modals.remove(0);
        }
        self.modal_selected = 0;
    }

    fn show_end(&mut self, message: &str) {
        self.end_message = Some(message.to_string());
        self.images = None;
    }

    fn mark_done(&mut self) {
        self.done = true;
    }

    fn navigate(&mut self, url: &str) {
        self.navigated_to = Some(url.to_string());
    }

    fn set_unload_guard(&mut self, message: Option<&str>) {
        self.unload_guard = message.map(str::to_string);
    }
}

/// Split question text into plain and `<b>`-emphasized runs.
pub(crate) fn emphasis_runs(text: &str) -> Vec<(&str, bool)> {
    let mut runs = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("<b>") {
        let after = &rest[open + 3..];
        let Some(close) = after.find("</b>") else {
            break;
        };
        if open > 0 {
            runs.push((&rest[..open], false));
        }
        runs.push((&after[..close], true));
        rest = &after[close + 4..];
    }
    if !rest.is_empty() {
        runs.push((rest, false));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_is_split_out() {
        assert_eq!(
            emphasis_runs("Who is <b>a nurse</b>?"),
            [("Who is ", false), ("a nurse", true), ("?", false)]
        );
        assert_eq!(emphasis_runs("<b>x</b>"), [("x", true)]);
        assert_eq!(emphasis_runs("plain"), [("plain", false)]);
        assert_eq!(emphasis_runs("open <b>tag"), [("open <b>tag", false)]);
    }

    #[test]
    fn undecodable_images_have_no_preview() {
        let image = ShownImage::new(&LoadedImage {
            url: "/img/0/l".into(),
            bytes: Vec::new(),
            width: 4,
            height: 4,
        });
        assert!(image.preview(10, 10).is_none());
    }

    #[test]
    fn preview_uses_half_blocks() {
        let mut bytes = Vec::new();
        DynamicImage::new_rgb8(8, 8)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let image = ShownImage::new(&LoadedImage {
            url: "/img/0/l".into(),
            bytes,
            width: 8,
            height: 8,
        });
        let lines = image.preview(4, 2).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 4);
    }

    #[test]
    fn close_modal_removes_oldest() {
        let mut view = TerminalView::new();
        view.open_modal(Modal::new("first", "", Vec::new()));
        view.open_modal(Modal::new("second", "", Vec::new()));
        view.close_modal();
        assert_eq!(view.top_modal().map(Modal::title), Some("second"));
    }
}
