/// What the buttons of a survey modal can ask the survey to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurveyAction {
    /// Leave the survey without saving.
    ExitSurvey,
    /// Save the answers collected so far.
    Submit,
}

/// A labeled button of a [`Modal`], bound to the action it triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton<A> {
    pub label: String,
    pub action: A,
}

impl<A> ActionButton<A> {
    pub fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// A dialog overlay with a title, a body and action buttons.
///
/// The modal is shown as soon as its owner hands it to a view; there is no
/// separate "show" step. Pressing a button yields the bound action for the
/// owner to dispatch. The modal never dismisses itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal<A> {
    title: String,
    body: String,
    buttons: Vec<ActionButton<A>>,
}

impl<A> Modal<A> {
    /// Create a modal. The body may contain simple markup (`<br>`, `<b>`).
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        buttons: Vec<ActionButton<A>>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            buttons,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn buttons(&self) -> &[ActionButton<A>] {
        &self.buttons
    }

    /// Button labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.label.as_str()).collect()
    }

    /// The action bound to the button at `index`.
    pub fn press(&self, index: usize) -> Option<&A> {
        self.buttons.get(index).map(|b| &b.action)
    }

    /// The body with markup tags removed and `<br>` turned into newlines.
    ///
    /// For frontends that cannot render markup.
    pub fn plain_body(&self) -> String {
        let mut plain = String::with_capacity(self.body.len());
        let mut rest = self.body.as_str();
        while let Some(open) = rest.find('<') {
            plain.push_str(&rest[..open]);
            let Some(close) = rest[open..].find('>') else {
                plain.push_str(&rest[open..]);
                rest = "";
                break;
            };
            let tag = &rest[open + 1..open + close];
            if tag.trim_end_matches('/').trim().eq_ignore_ascii_case("br") {
                plain.push('\n');
            }
            rest = &rest[open + close + 1..];
        }
        plain.push_str(rest);
        plain
    }
}
