use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

// ---------------------------------------------------------------------------
// User-facing notifications (warnings and yes/no questions)
// ---------------------------------------------------------------------------

/// Answer to a question put to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserChoice {
    Ok,
    Yes,
    No,
    YesToAll,
    NoToAll,
}

impl UserChoice {
    pub fn label(self) -> &'static str {
        match self {
            UserChoice::Ok => "OK",
            UserChoice::Yes => "Yes",
            UserChoice::No => "No",
            UserChoice::YesToAll => "Yes to All",
            UserChoice::NoToAll => "No to All",
        }
    }

    /// `Yes` or `YesToAll`.
    pub fn accepts(self) -> bool {
        matches!(self, UserChoice::Yes | UserChoice::YesToAll)
    }

    /// `YesToAll` or `NoToAll`: the answer holds for the rest of a batch.
    pub fn is_sticky(self) -> bool {
        matches!(self, UserChoice::YesToAll | UserChoice::NoToAll)
    }
}

/// Where the models send warnings and questions.
pub trait Notifier {
    fn warn(&mut self, title: &str, message: &str);

    fn ask(
        &mut self,
        title: &str,
        message: &str,
        options: &[UserChoice],
        default: UserChoice,
    ) -> UserChoice;
}

/// Logs everything and always answers with the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&mut self, title: &str, message: &str) {
        log::warn!("{title}: {message}");
    }

    fn ask(
        &mut self,
        title: &str,
        message: &str,
        _options: &[UserChoice],
        default: UserChoice,
    ) -> UserChoice {
        log::warn!("{title}: {message} (answering {})", default.label());
        default
    }
}

/// Buttons a native message box can show at once.
const MAX_BUTTONS: usize = 3;

/// One button on a dialog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Choice(UserChoice),
    /// Moves on to the next page.
    More,
}

impl Button {
    fn label(self) -> &'static str {
        match self {
            Button::Choice(c) => c.label(),
            Button::More => "More…",
        }
    }
}

/// Split `options` into pages of at most [`MAX_BUTTONS`] buttons.  Every
/// page but the last ends with a `More…` button.
fn dialog_pages(options: &[UserChoice]) -> Vec<Vec<Button>> {
    let mut pages = Vec::new();
    let mut rest = options;
    while rest.len() > MAX_BUTTONS {
        let (page, tail) = rest.split_at(MAX_BUTTONS - 1);
        pages.push(
            page.iter()
                .copied()
                .map(Button::Choice)
                .chain([Button::More])
                .collect(),
        );
        rest = tail;
    }
    if !rest.is_empty() {
        pages.push(rest.iter().copied().map(Button::Choice).collect());
    }
    pages
}

/// The button behind a dialog result; `None` when the box was dismissed.
fn pressed(page: &[Button], result: MessageDialogResult) -> Option<Button> {
    match result {
        MessageDialogResult::Custom(label) => page.iter().copied().find(|b| b.label() == label),
        MessageDialogResult::Ok | MessageDialogResult::Yes => page.first().copied(),
        MessageDialogResult::No => page.get(1).copied(),
        MessageDialogResult::Cancel => None,
    }
}

/// Native message boxes via `rfd`.  Blocks the calling (UI) thread.
///
/// Questions with more options than one box can hold are asked over several
/// boxes linked by `More…`.  Closing any of them picks the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn warn(&mut self, title: &str, message: &str) {
        log::warn!("{title}: {message}");
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn ask(
        &mut self,
        title: &str,
        message: &str,
        options: &[UserChoice],
        default: UserChoice,
    ) -> UserChoice {
        for page in dialog_pages(options) {
            let label = |i: usize| page[i].label().to_string();
            let buttons = match page.len() {
                1 => MessageButtons::OkCustom(label(0)),
                2 => MessageButtons::OkCancelCustom(label(0), label(1)),
                _ => MessageButtons::YesNoCancelCustom(label(0), label(1), label(2)),
            };
            let result = MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title(title)
                .set_description(message)
                .set_buttons(buttons)
                .show();
            match pressed(&page, result) {
                Some(Button::Choice(choice)) => return choice,
                Some(Button::More) => continue,
                None => break,
            }
        }
        default
    }
}
