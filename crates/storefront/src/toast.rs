//! Transient notification toasts.
//!
//! Each toast is appended to the toast container, gains its `active` class
//! on the next frame, and dismisses itself after a fixed delay unless the
//! user closes it first. Dismissal plays an exit transition and the
//! fragment is removed once that delay has passed.
//!
//! Timers are never cancelled, so every step is idempotent: a dismiss
//! timer firing after a manual close, or a removal of a toast that is
//! already gone, does nothing.

use std::time::Duration;

use askama::Template;
use serde::Serialize;

use jardin_core::{ToastId, ToastKind};

use crate::config::ToastConfig;
use crate::dom::{Fragment, MountPoint, Page};
use crate::scheduler::Scheduler;

const SUCCESS_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="2" stroke="currentColor" class="toast-icon"><path stroke-linecap="round" stroke-linejoin="round" d="M9 12.75 11.25 15 15 9.75M21 12a9 9 0 1 1-18 0 9 9 0 0 1 18 0Z" /></svg>"#;
const ERROR_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="2" stroke="currentColor" class="toast-icon"><path stroke-linecap="round" stroke-linejoin="round" d="m9.75 9.75 4.5 4.5m0-4.5-4.5 4.5M21 12a9 9 0 1 1-18 0 9 9 0 0 1 18 0Z" /></svg>"#;
const INFO_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="2" stroke="currentColor" class="toast-icon"><path stroke-linecap="round" stroke-linejoin="round" d="m11.25 11.25.041-.02a.75.75 0 0 1 1.063.852l-.708 2.836a.75.75 0 0 0 1.063.853l.041-.021M21 12a9 9 0 1 1-18 0 9 9 0 0 1 18 0Zm-9-3.75h.008v.008H12V8.25Z" /></svg>"#;

const fn icon(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => SUCCESS_ICON,
        ToastKind::Error => ERROR_ICON,
        ToastKind::Info => INFO_ICON,
    }
}

/// Toast fragment template.
#[derive(Template)]
#[template(path = "partials/toast.html")]
struct ToastTemplate<'a> {
    id: ToastId,
    icon: &'a str,
    message: &'a str,
}

/// Lifecycle phase of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPhase {
    /// Appended, waiting for the entry transition.
    Entering,
    /// Fully shown.
    Visible,
    /// Exit transition running; removal is pending.
    Leaving,
}

/// One live toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub phase: ToastPhase,
}

/// Deferred toast work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTask {
    /// Entry transition on the next frame.
    Activate(ToastId),
    /// Auto-dismiss timeout.
    Dismiss(ToastId),
    /// Removal after the exit transition.
    Remove(ToastId),
}

/// Creates and retires toasts in the toast container.
#[derive(Debug)]
pub struct ToastEmitter {
    config: ToastConfig,
    next_id: ToastId,
    toasts: Vec<Toast>,
}

impl ToastEmitter {
    /// Mounts the emitter needs to be usable.
    pub const REQUIRED_MOUNTS: [MountPoint; 1] = [MountPoint::ToastContainer];

    /// Attach to `page`, or `None` if there is no toast container.
    #[must_use]
    pub fn attach(page: &Page, config: ToastConfig) -> Option<Self> {
        page.has_all(&Self::REQUIRED_MOUNTS).then(|| Self {
            config,
            next_id: ToastId::new(1),
            toasts: Vec::new(),
        })
    }

    /// Live toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Look up a live toast.
    #[must_use]
    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    /// Toasts not yet leaving.
    #[must_use]
    pub fn showing(&self) -> usize {
        self.toasts
            .iter()
            .filter(|t| t.phase != ToastPhase::Leaving)
            .count()
    }

    /// Show a toast.
    ///
    /// When the visible bound is reached the oldest showing toast is
    /// dismissed to make room.
    ///
    /// # Errors
    ///
    /// Returns an error if the toast template fails to render.
    pub fn emit<T: From<ToastTask>>(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        page: &mut Page,
        scheduler: &mut Scheduler<T>,
    ) -> Result<ToastId, askama::Error> {
        let message = message.into();
        let id = self.next_id;

        let html = ToastTemplate {
            id,
            icon: icon(kind),
            message: &message,
        }
        .render()?;
        self.next_id = id.next();

        if let Some(max) = self.config.max_visible {
            while self.showing() >= max {
                let Some(oldest) = self
                    .toasts
                    .iter()
                    .find(|t| t.phase != ToastPhase::Leaving)
                    .map(|t| t.id)
                else {
                    break;
                };
                self.dismiss(oldest, page, scheduler);
            }
        }

        page.with(MountPoint::ToastContainer, |container| {
            container
                .children
                .push(Fragment::new(fragment_key(id), ["toast", kind.as_str()], html));
        });
        self.toasts.push(Toast {
            id,
            kind,
            message,
            phase: ToastPhase::Entering,
        });

        scheduler.schedule(Duration::ZERO, ToastTask::Activate(id).into());
        scheduler.schedule(self.config.dismiss_after, ToastTask::Dismiss(id).into());

        tracing::debug!(toast_id = %id, kind = %kind, "Toast shown");
        Ok(id)
    }

    /// Start the exit transition of a toast.
    ///
    /// Returns `false` if the toast is already leaving or gone.
    pub fn dismiss<T: From<ToastTask>>(
        &mut self,
        id: ToastId,
        page: &mut Page,
        scheduler: &mut Scheduler<T>,
    ) -> bool {
        let Some(toast) = self
            .toasts
            .iter_mut()
            .find(|t| t.id == id && t.phase != ToastPhase::Leaving)
        else {
            return false;
        };

        toast.phase = ToastPhase::Leaving;
        set_fragment_active(page, id, false);
        scheduler.schedule(self.config.exit_after, ToastTask::Remove(id).into());
        tracing::debug!(toast_id = %id, "Toast dismissed");
        true
    }

    /// Run a deferred toast step.
    pub fn run<T: From<ToastTask>>(
        &mut self,
        task: ToastTask,
        page: &mut Page,
        scheduler: &mut Scheduler<T>,
    ) {
        match task {
            ToastTask::Activate(id) => {
                if let Some(toast) = self
                    .toasts
                    .iter_mut()
                    .find(|t| t.id == id && t.phase == ToastPhase::Entering)
                {
                    toast.phase = ToastPhase::Visible;
                    set_fragment_active(page, id, true);
                }
            }
            ToastTask::Dismiss(id) => {
                self.dismiss(id, page, scheduler);
            }
            ToastTask::Remove(id) => {
                self.toasts.retain(|t| t.id != id);
                page.with(MountPoint::ToastContainer, |container| {
                    container.remove_child(&fragment_key(id));
                });
            }
        }
    }
}

fn fragment_key(id: ToastId) -> String {
    format!("toast-{id}")
}

fn set_fragment_active(page: &mut Page, id: ToastId, active: bool) {
    page.with(MountPoint::ToastContainer, |container| {
        if let Some(fragment) = container.child_mut(&fragment_key(id)) {
            if active {
                fragment.classes.insert("active".to_string());
            } else {
                fragment.classes.remove("active");
            }
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn drain(
        emitter: &mut ToastEmitter,
        page: &mut Page,
        scheduler: &mut Scheduler<ToastTask>,
        until_ms: u64,
    ) {
        let until = Duration::from_millis(until_ms);
        while let Some((_, task)) = scheduler.pop_due(until) {
            emitter.run(task, page, scheduler);
        }
    }

    fn setup(config: ToastConfig) -> (ToastEmitter, Page, Scheduler<ToastTask>) {
        let page = Page::standard();
        let emitter = ToastEmitter::attach(&page, config).unwrap();
        (emitter, page, Scheduler::new())
    }

    fn container(page: &Page) -> &crate::dom::Element {
        page.get(MountPoint::ToastContainer).unwrap()
    }

    #[test]
    fn test_attach_requires_container() {
        let page = Page::without(&[MountPoint::ToastContainer]);
        assert!(ToastEmitter::attach(&page, ToastConfig::default()).is_none());
    }

    #[test]
    fn test_lifecycle() {
        let (mut emitter, mut page, mut scheduler) = setup(ToastConfig::default());
        let id = emitter
            .emit(ToastKind::Success, "Velvet Rose added to cart!", &mut page, &mut scheduler)
            .unwrap();

        let fragment = container(&page).child("toast-1").unwrap();
        assert!(fragment.has_class("toast"));
        assert!(fragment.has_class("success"));
        assert!(!fragment.has_class("active"));
        assert!(fragment.html.contains("Velvet Rose added to cart!"));

        drain(&mut emitter, &mut page, &mut scheduler, 0);
        assert_eq!(emitter.get(id).unwrap().phase, ToastPhase::Visible);
        assert!(container(&page).child("toast-1").unwrap().has_class("active"));

        drain(&mut emitter, &mut page, &mut scheduler, 2999);
        assert_eq!(emitter.get(id).unwrap().phase, ToastPhase::Visible);

        drain(&mut emitter, &mut page, &mut scheduler, 3000);
        assert_eq!(emitter.get(id).unwrap().phase, ToastPhase::Leaving);
        assert!(!container(&page).child("toast-1").unwrap().has_class("active"));

        drain(&mut emitter, &mut page, &mut scheduler, 3300);
        assert!(emitter.get(id).is_none());
        assert!(container(&page).children.is_empty());
    }

    #[test]
    fn test_manual_dismiss_then_timer_is_harmless() {
        let (mut emitter, mut page, mut scheduler) = setup(ToastConfig::default());
        let id = emitter
            .emit(ToastKind::Info, "hello", &mut page, &mut scheduler)
            .unwrap();
        drain(&mut emitter, &mut page, &mut scheduler, 10);

        assert!(emitter.dismiss(id, &mut page, &mut scheduler));
        assert!(!emitter.dismiss(id, &mut page, &mut scheduler));
        drain(&mut emitter, &mut page, &mut scheduler, 400);
        assert!(container(&page).children.is_empty());

        // Auto-dismiss timer fires against the removed toast.
        drain(&mut emitter, &mut page, &mut scheduler, 5000);
        assert!(container(&page).children.is_empty());
        assert!(emitter.toasts().is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_dismiss_before_entry_skips_activation() {
        let (mut emitter, mut page, mut scheduler) = setup(ToastConfig::default());
        let id = emitter
            .emit(ToastKind::Error, "oops", &mut page, &mut scheduler)
            .unwrap();
        emitter.dismiss(id, &mut page, &mut scheduler);
        drain(&mut emitter, &mut page, &mut scheduler, 0);
        assert_eq!(emitter.get(id).unwrap().phase, ToastPhase::Leaving);
        assert!(!container(&page).child("toast-1").unwrap().has_class("active"));
    }

    #[test]
    fn test_bound_dismisses_oldest() {
        let config = ToastConfig {
            max_visible: Some(2),
            ..ToastConfig::default()
        };
        let (mut emitter, mut page, mut scheduler) = setup(config);
        let first = emitter.emit(ToastKind::Info, "1", &mut page, &mut scheduler).unwrap();
        let second = emitter.emit(ToastKind::Info, "2", &mut page, &mut scheduler).unwrap();
        let third = emitter.emit(ToastKind::Info, "3", &mut page, &mut scheduler).unwrap();

        assert_eq!(emitter.get(first).unwrap().phase, ToastPhase::Leaving);
        assert_eq!(emitter.get(second).unwrap().phase, ToastPhase::Entering);
        assert_eq!(emitter.get(third).unwrap().phase, ToastPhase::Entering);
        assert_eq!(emitter.showing(), 2);
    }

    #[test]
    fn test_unbounded_keeps_everything() {
        let config = ToastConfig {
            max_visible: None,
            ..ToastConfig::default()
        };
        let (mut emitter, mut page, mut scheduler) = setup(config);
        for n in 0..20 {
            emitter
                .emit(ToastKind::Info, n.to_string(), &mut page, &mut scheduler)
                .unwrap();
        }
        assert_eq!(emitter.showing(), 20);
        assert_eq!(container(&page).children.len(), 20);
    }

    #[test]
    fn test_message_is_escaped() {
        let (mut emitter, mut page, mut scheduler) = setup(ToastConfig::default());
        emitter
            .emit(ToastKind::Info, "<b>bold</b>", &mut page, &mut scheduler)
            .unwrap();
        let html = &container(&page).child("toast-1").unwrap().html;
        assert!(html.contains("&#60;b&#62;bold"));
        assert!(html.contains("<svg"));
    }
}
