//! Viewer session state machine.
//!
//! `Idle -> Loading -> Ready | Error`, re-entering `Loading` whenever the
//! active language or spec file changes. Every load carries a sequence
//! number; completion events with a stale sequence are discarded, so a load
//! superseded by a language switch can never clobber the newer one.

use crate::openapi::{Document, EndpointKey};

#[derive(Debug, Default)]
pub struct SpecBrowser {
    state: ViewerState,
    next_seq: u64,
}

#[derive(Debug, Default)]
pub enum ViewerState {
    #[default]
    Idle,
    Loading {
        language: String,
        file: String,
        seq: u64,
    },
    Ready(ReadyView),
    Error {
        message: String,
    },
}

#[derive(Debug)]
pub struct ReadyView {
    pub language: String,
    pub file: String,
    pub document: Document,
    pub selected: Option<EndpointKey>,
}

#[derive(Debug)]
pub enum ViewerEvent {
    LanguageChanged { language: String, file: String },
    FileChanged { file: String },
    SpecLoaded { seq: u64, document: Document },
    SpecLoadFailed { seq: u64, message: String },
}

/// What applying an event did.
#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    LoadStarted { seq: u64 },
    Ready,
    Failed,
    Ignored,
}

impl SpecBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn apply(&mut self, event: ViewerEvent) -> Applied {
        match event {
            ViewerEvent::LanguageChanged { language, file } => self.start_load(language, file),
            ViewerEvent::FileChanged { file } => {
                let language = match &self.state {
                    ViewerState::Loading { language, .. } => language.clone(),
                    ViewerState::Ready(view) => view.language.clone(),
                    // No language to reload under yet.
                    ViewerState::Idle | ViewerState::Error { .. } => return Applied::Ignored,
                };
                self.start_load(language, file)
            }
            ViewerEvent::SpecLoaded { seq, document } => {
                let (language, file) = match &self.state {
                    ViewerState::Loading {
                        language,
                        file,
                        seq: current,
                    } if *current == seq => (language.clone(), file.clone()),
                    _ => return Applied::Ignored,
                };
                let selected = document.first_endpoint();
                self.state = ViewerState::Ready(ReadyView {
                    language,
                    file,
                    document,
                    selected,
                });
                Applied::Ready
            }
            ViewerEvent::SpecLoadFailed { seq, message } => match &self.state {
                ViewerState::Loading { seq: current, .. } if *current == seq => {
                    self.state = ViewerState::Error { message };
                    Applied::Failed
                }
                _ => Applied::Ignored,
            },
        }
    }

    /// Explicit selection on a ready view; unknown endpoints are ignored.
    pub fn select_endpoint(&mut self, path: &str, method: &str) -> bool {
        if let ViewerState::Ready(view) = &mut self.state {
            if view.document.operation(path, method).is_some() {
                view.selected = Some(EndpointKey {
                    path: path.to_string(),
                    method: method.to_string(),
                });
                return true;
            }
        }
        false
    }

    fn start_load(&mut self, language: String, file: String) -> Applied {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.state = ViewerState::Loading {
            language,
            file,
            seq,
        };
        Applied::LoadStarted { seq }
    }
}
