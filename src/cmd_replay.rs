//! `replay` subcommand.
//!
//! A script is a JSON-lines file of page steps. Each step is applied to a
//! [`MemoryPage`] through the dispatcher; after each step outstanding
//! corrections are awaited and every newly presented overlay frame is
//! printed as one JSON line. `wait` steps move a manual clock, so timer
//! behaviour does not depend on wall time.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use proofmark_config::Config;
use proofmark_core::{Dispatcher, ManualClock, MemoryElement, MemoryPage, PageEvent};
use proofmark_protocols::{EditableSurface, ElementId, ElementKind, GrammarProvider, HitTarget, Rect};

use crate::register::build_provider;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub(crate) enum ScriptStep {
    /// Insert an element into the page.
    Add {
        id: u64,
        kind: ElementKind,
        rect: Rect,
        #[serde(default = "default_spellcheck")]
        spellcheck: bool,
        #[serde(default)]
        text: String,
    },
    Remove {
        id: u64,
    },
    /// Replace the element's text and emit an input event.
    Type {
        id: u64,
        text: String,
    },
    Focus {
        id: u64,
    },
    Blur,
    Click {
        target: HitTarget,
    },
    Hover {
        target: HitTarget,
        entered: bool,
    },
    Scroll {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    Resize {
        id: u64,
        rect: Rect,
    },
    Wait {
        ms: u64,
    },
}

fn default_spellcheck() -> bool {
    true
}

/// Parse a script, ignoring blank lines and `#` comments.
pub(crate) fn parse_script(content: &str) -> Result<Vec<ScriptStep>, String> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| format!("line {}: {}", index + 1, e))
        })
        .collect()
}

pub(crate) async fn handle_replay(config: &Config, script: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(script)?;
    let steps = parse_script(&content)?;
    info!("Replaying {} steps from {}", steps.len(), script.display());

    let provider = build_provider(&config.provider);
    for line in replay(&steps, provider, config).await? {
        println!("{}", line);
    }
    Ok(())
}

/// Run `steps` and return the printed output lines.
pub(crate) async fn replay(
    steps: &[ScriptStep],
    provider: Arc<dyn GrammarProvider>,
    config: &Config,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let clock = Arc::new(ManualClock::new());
    let mut dispatcher = Dispatcher::new(MemoryPage::default(), provider, clock.clone(), config.overlay.clone());
    let mut output = Vec::new();
    let mut dismissed = 0;

    for step in steps {
        apply_step(&mut dispatcher, &clock, step);
        dispatcher.settle().await;
        dispatcher.advance();

        for frame in dispatcher.page_mut().take_frames() {
            output.push(serde_json::to_string(&frame)?);
        }
        let page = dispatcher.page();
        for session in &page.dismissed()[dismissed..] {
            output.push(format!("dismissed {}", session));
        }
        dismissed = page.dismissed().len();
    }

    Ok(output)
}

fn apply_step(dispatcher: &mut Dispatcher<MemoryPage>, clock: &ManualClock, step: &ScriptStep) {
    match step {
        ScriptStep::Add {
            id,
            kind,
            rect,
            spellcheck,
            text,
        } => {
            let element = MemoryElement::new(*kind, *rect)
                .with_spellcheck(*spellcheck)
                .with_text(text.clone());
            dispatcher.page_mut().insert_at(ElementId::new(*id), element);
            dispatcher.handle(PageEvent::SubtreeChanged {
                added: vec![ElementId::new(*id)],
                removed: vec![],
            });
        }
        ScriptStep::Remove { id } => {
            dispatcher.page_mut().remove(ElementId::new(*id));
            dispatcher.handle(PageEvent::SubtreeChanged {
                added: vec![],
                removed: vec![ElementId::new(*id)],
            });
        }
        ScriptStep::Type { id, text } => {
            let id = ElementId::new(*id);
            dispatcher.page_mut().type_text(id, text.clone());
            dispatcher.handle(PageEvent::Input { target: id });
        }
        ScriptStep::Focus { id } => {
            let id = ElementId::new(*id);
            let previous = dispatcher.page().active_element();
            dispatcher.page_mut().focus(Some(id));
            if let Some(previous) = previous.filter(|p| *p != id) {
                dispatcher.handle(PageEvent::FocusOut {
                    target: HitTarget::Element(previous),
                    related: Some(HitTarget::Element(id)),
                });
            }
            dispatcher.handle(PageEvent::FocusIn {
                target: HitTarget::Element(id),
            });
        }
        ScriptStep::Blur => {
            if let Some(previous) = dispatcher.page().active_element() {
                dispatcher.page_mut().focus(None);
                dispatcher.handle(PageEvent::FocusOut {
                    target: HitTarget::Element(previous),
                    related: None,
                });
            }
        }
        ScriptStep::Click { target } => dispatcher.handle(PageEvent::Click { target: *target }),
        ScriptStep::Hover { target, entered } => dispatcher.handle(PageEvent::Hover {
            target: *target,
            entered: *entered,
        }),
        ScriptStep::Scroll { dx, dy } => {
            dispatcher.page_mut().scroll_by(*dx, *dy);
            dispatcher.handle(PageEvent::LayoutChanged);
        }
        ScriptStep::Resize { id, rect } => {
            dispatcher.page_mut().set_rect(ElementId::new(*id), *rect);
            dispatcher.handle(PageEvent::LayoutChanged);
        }
        ScriptStep::Wait { ms } => clock.advance(Duration::from_millis(*ms)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proofmark_protocols::ProviderError;

    struct UppercaseFirst;

    #[async_trait]
    impl GrammarProvider for UppercaseFirst {
        fn id(&self) -> &str {
            "uppercase"
        }

        async fn is_supported(&self) -> bool {
            true
        }

        async fn fix_grammar(&self, text: &str) -> Result<String, ProviderError> {
            let mut chars = text.chars();
            Ok(match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            })
        }
    }

    const SCRIPT: &str = r#"
# one textarea, typed into and corrected
{"step":"add","id":1,"kind":"text_area","rect":{"x":100,"y":100,"width":400,"height":200}}
{"step":"focus","id":1}
{"step":"type","id":1,"text":"hello there"}
{"step":"click","target":{"type":"button"}}
{"step":"wait","ms":1500}
{"step":"remove","id":1}
"#;

    #[test]
    fn test_parse_script() {
        let steps = parse_script(SCRIPT).unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[1], ScriptStep::Focus { id: 1 });
        assert_eq!(
            steps[3],
            ScriptStep::Click {
                target: HitTarget::Button
            }
        );
        assert!(matches!(&steps[0], ScriptStep::Add { spellcheck: true, text, .. } if text.is_empty()));
    }

    #[test]
    fn test_demo_script_parses() {
        let steps = parse_script(include_str!("../demos/typing.jsonl")).unwrap();
        assert_eq!(steps.len(), 13);
        assert_eq!(steps.last(), Some(&ScriptStep::Remove { id: 2 }));
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script("{\"step\":\"blur\"}\n{\"step\":\"jump\"}").unwrap_err();
        assert!(err.starts_with("line 2:"), "{}", err);
    }

    #[tokio::test]
    async fn test_replay_applies_and_reverts() {
        let steps = parse_script(SCRIPT).unwrap();
        let output = replay(&steps, Arc::new(UppercaseFirst), &Config::default())
            .await
            .unwrap();

        let frames: Vec<serde_json::Value> = output
            .iter()
            .filter(|line| line.starts_with('{'))
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert!(frames.iter().any(|f| f["button"]["icon"] == "warning"));
        assert!(frames.iter().any(|f| f["button"]["icon"] == "check"));
        assert_eq!(frames.last().unwrap()["button"]["icon"], "info");
        assert_eq!(output.last().unwrap(), "dismissed session-1");
    }
}
