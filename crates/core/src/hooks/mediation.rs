//! Markup mediation
//!
//! Appends text to a piece of UI markup that the engine resolves in the
//! middle of another call. Three hooks cooperate:
//!
//! - the **producer** (Before, on the producer target) derives the extra
//!   text from the call, parks it in a session slot and enables the mediator;
//! - the **mediator** (Before, on the markup target, registered disabled)
//!   resolves both the engine's markup and the parked text through the
//!   original resolver and blocks with their concatenation;
//! - the **terminator** (AfterUnconditional, on the producer target) turns
//!   the mediator off again whatever happened.
//!
//! While disabled the mediator is not on the markup target's dispatch path
//! at all.

use hookwork_engine::Value;

use super::context::{CallContext, Decision};
use super::dispatch::Dispatcher;
use super::registry::{HookKey, Phase, TargetId};

/// Argument of the markup target holding the markup to resolve
const MARKUP_ARG: &str = "Markup";

/// Indent applied to appended lines when the markup already spans lines
const CONTINUATION_INDENT: &str = "    ";

/// Join resolved markup with appended text
///
/// Single-line markup gets the extra text on a new line. Markup that already
/// spans several lines gets the extra text indented after its last line.
pub fn concat_markup(original: &str, extra: &str) -> String {
    if original.contains('\n') {
        format!("{original}{CONTINUATION_INDENT}{extra}")
    } else {
        format!("{original}\n{extra}")
    }
}

/// Keys of the three mediation hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediationKeys {
    pub producer: HookKey,
    pub mediator: HookKey,
    pub terminator: HookKey,
}

impl MediationKeys {
    /// Hooks that are enabled with their owner
    pub fn persistent(&self) -> [HookKey; 2] {
        [self.producer, self.terminator]
    }

    pub fn all(&self) -> [HookKey; 3] {
        [self.producer, self.mediator, self.terminator]
    }
}

/// Installer for a producer/mediator/terminator trio
#[derive(Debug, Clone)]
pub struct MarkupMediation {
    name: String,
    producer_target: TargetId,
    markup_target: TargetId,
    slot: String,
}

impl MarkupMediation {
    pub fn new(
        name: &str,
        producer_target: impl Into<TargetId>,
        markup_target: impl Into<TargetId>,
    ) -> Self {
        Self {
            name: name.to_string(),
            producer_target: producer_target.into(),
            markup_target: markup_target.into(),
            slot: format!("{name}.pending"),
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Register the three hooks. `producer` returns the text to append, or
    /// `None` when the call needs no extra markup.
    pub fn install<F>(&self, dispatcher: &Dispatcher, producer: F) -> MediationKeys
    where
        F: Fn(&CallContext<'_>) -> Option<String> + Send + Sync + 'static,
    {
        let mediator = {
            let slot = self.slot.clone();
            dispatcher.register_disabled(
                self.markup_target.clone(),
                Phase::Before,
                &format!("{}::mediator", self.name),
                move |ctx| mediate(ctx, &slot),
            )
        };

        let producer = {
            let slot = self.slot.clone();
            dispatcher.register_named(
                self.producer_target.clone(),
                Phase::Before,
                &format!("{}::producer", self.name),
                true,
                move |ctx| {
                    match producer(ctx).filter(|text| !text.is_empty()) {
                        Some(text) => {
                            ctx.write_slot(&slot, text);
                            if let Err(e) = ctx.dispatcher().enable(mediator) {
                                tracing::warn!("Failed to enable markup mediator: {}", e);
                            }
                        }
                        None => ctx.clear_slot(&slot),
                    }
                    Decision::Continue
                },
            )
        };

        let terminator = dispatcher.register_named(
            self.producer_target.clone(),
            Phase::AfterUnconditional,
            &format!("{}::terminator", self.name),
            true,
            move |ctx| {
                if let Err(e) = ctx.dispatcher().disable(mediator) {
                    tracing::warn!("Failed to disable markup mediator: {}", e);
                }
                Decision::Continue
            },
        );

        tracing::debug!(
            "Installed markup mediation '{}' ({} -> {})",
            self.name,
            self.producer_target,
            self.markup_target
        );

        MediationKeys {
            producer,
            mediator,
            terminator,
        }
    }
}

/// The slot is only cleared once the concatenation is done, so a failed
/// resolution leaves the text for the engine's next attempt.
fn mediate(ctx: &mut CallContext<'_>, slot: &str) -> Decision {
    let extra = ctx.peek_slot(slot);
    if extra.is_empty() {
        return Decision::Continue;
    }

    let original = match ctx.pending().value() {
        Some(value) => value.clone(),
        None => match ctx.invoke_original() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to resolve markup on {}: {}", ctx.target(), e);
                return Decision::Continue;
            }
        },
    };
    let original = original.as_str().unwrap_or_default().to_string();

    let extra_args = ctx.args().replaced(MARKUP_ARG, Value::Str(extra));
    match ctx.invoke_original_with(extra_args) {
        Ok(resolved) => {
            ctx.clear_slot(slot);
            let resolved = resolved.as_str().unwrap_or_default();
            Decision::block(concat_markup(&original, resolved))
        }
        Err(e) => {
            tracing::warn!("Failed to resolve appended markup on {}: {}", ctx.target(), e);
            Decision::block(original)
        }
    }
}
