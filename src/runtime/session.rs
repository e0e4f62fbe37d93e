use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use crate::config::MasonryOptions;
use crate::error::{MasonryError, Result};
use crate::geometry::Length;
use crate::layout::{self, LayoutResult};
use crate::logging::{
    GATE_TARGET, LogLevel, Logger, METRICS_TARGET, SESSION_TARGET, TRACKING_TARGET,
    event_with_fields, json_kv, json_str,
};
use crate::metrics::{LayoutMetrics, MetricSnapshot};
use crate::surface::{ImageId, ImageOutcome, ItemIndex, Surface};

use super::audit::{SessionAudit, SessionAuditEventBuilder, SessionAuditStage};
use super::debounce::{Debouncer, Trigger};
use super::gate::{GateStatus, ImageGate};
use super::scheduler::{Clock, SystemClock, TimerQueue};
use super::tracking::SizeTracker;

type InitHook = Box<dyn FnOnce()>;
type LayoutHook = Box<dyn FnMut(&LayoutResult)>;

/// Lifecycle of a session. `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    AwaitingImages,
    LaidOut,
    Disposed,
}

/// Signals the host forwards from its rendering environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The viewport was resized.
    Resize,
    /// A tracked item's box changed size.
    ItemResized(ItemIndex),
    /// A watched image finished loading or failed.
    ImageSettled {
        image: ImageId,
        outcome: ImageOutcome,
    },
}

impl HostEvent {
    fn describe(&self) -> &'static str {
        match self {
            HostEvent::Resize => "resize",
            HostEvent::ItemResized(_) => "item_resized",
            HostEvent::ImageSettled { .. } => "image_settled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTask {
    Recompute,
}

/// Collects options, services and hooks, then binds them to a surface.
pub struct MasonryBuilder {
    options: MasonryOptions,
    clock: Option<Arc<dyn Clock>>,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<LayoutMetrics>>>,
    audit: Option<Arc<dyn SessionAudit>>,
    on_init: Option<InitHook>,
    on_layout_complete: Option<LayoutHook>,
}

impl MasonryBuilder {
    pub fn new(options: MasonryOptions) -> Self {
        Self {
            options,
            clock: None,
            logger: None,
            metrics: None,
            audit: None,
            on_init: None,
            on_layout_complete: None,
        }
    }

    /// Time source for debouncing. Defaults to [`SystemClock`].
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(mut self) -> Self {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(LayoutMetrics::new())));
        }
        self
    }

    /// Share an existing metrics accumulator.
    pub fn metrics(mut self, metrics: Arc<Mutex<LayoutMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn audit<A>(mut self, audit: A) -> Self
    where
        A: SessionAudit + 'static,
    {
        self.audit = Some(Arc::new(audit));
        self
    }

    /// Runs once, after the first committed pass.
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_init = Some(Box::new(hook));
        self
    }

    /// Runs after every committed pass.
    pub fn on_layout_complete<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&LayoutResult) + 'static,
    {
        self.on_layout_complete = Some(Box::new(hook));
        self
    }

    /// Validate, bind to `surface`, and run (or gate) the first pass.
    pub fn build<S: Surface>(self, surface: S) -> Result<MasonrySession<S>> {
        self.options.validate()?;
        if !surface.is_attached() {
            return Err(MasonryError::ContainerNotFound);
        }

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()) as Arc<dyn Clock>);
        let queue = TimerQueue::new(clock);
        let started_at = queue.now();

        let mut session = MasonrySession {
            debouncer: Debouncer::new(self.options.debounce()),
            tracker: SizeTracker::new(self.options.track_item_size_changes),
            options: self.options,
            surface,
            state: SessionState::Uninitialized,
            queue,
            gate: None,
            logger: self.logger,
            metrics: self.metrics,
            audit: self.audit,
            on_init: self.on_init,
            on_layout_complete: self.on_layout_complete,
            last_result: None,
            started_at,
        };

        session.audit_stage(
            SessionAuditStage::Constructed,
            [
                json_kv("items", json!(session.surface.item_count())),
                json_kv("wait_for_images", json!(session.options.init_on_image_load)),
            ],
        );
        session.log(
            LogLevel::Info,
            SESSION_TARGET,
            "session_constructed",
            [
                json_kv("items", json!(session.surface.item_count())),
                json_kv("columns", json!(session.options.columns.get())),
                json_str("gutter", session.options.gutter().to_string()),
            ],
        );

        if session.options.bind_on_scroll {
            session.surface.bind_resize();
        }

        if session.options.init_on_image_load {
            session.arm_gate();
        } else {
            session.run_pass();
            session.finish_init();
        }

        Ok(session)
    }
}

/// Binds a layout configuration to one container for its whole lifetime and
/// decides when to lay it out again.
pub struct MasonrySession<S: Surface> {
    options: MasonryOptions,
    surface: S,
    state: SessionState,
    queue: TimerQueue<SessionTask>,
    debouncer: Debouncer,
    gate: Option<ImageGate>,
    tracker: SizeTracker,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<LayoutMetrics>>>,
    audit: Option<Arc<dyn SessionAudit>>,
    on_init: Option<InitHook>,
    on_layout_complete: Option<LayoutHook>,
    last_result: Option<LayoutResult>,
    started_at: Duration,
}

impl<S: Surface> MasonrySession<S> {
    /// Shorthand for `MasonryBuilder::new(options).build(surface)`.
    pub fn new(surface: S, options: MasonryOptions) -> Result<Self> {
        MasonryBuilder::new(options).build(surface)
    }

    pub fn builder(options: MasonryOptions) -> MasonryBuilder {
        MasonryBuilder::new(options)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn options(&self) -> &MasonryOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for hosts that change the item set. Changes take
    /// effect on the next pass.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Most recently committed result.
    pub fn last_result(&self) -> Option<&LayoutResult> {
        self.last_result.as_ref()
    }

    pub fn is_recompute_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the host should call [`poll`](Self::poll) next.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline()
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let uptime = self.queue.now().saturating_sub(self.started_at);
        self.metrics
            .as_ref()
            .and_then(|metrics| metrics.lock().ok().map(|guard| guard.snapshot(uptime)))
    }

    /// Run a full layout pass now. Any debounced recompute still waiting is
    /// dropped, since this pass already reflects the current state.
    pub fn recompute(&mut self) -> Result<&LayoutResult> {
        self.ensure_live()?;
        self.debouncer.cancel(&mut self.queue);
        Ok(self.run_pass())
    }

    /// Feed a host event into the session.
    pub fn notify(&mut self, event: HostEvent) -> Result<()> {
        self.ensure_live()?;
        match event {
            HostEvent::Resize => {
                if !self.options.bind_on_scroll || self.state == SessionState::AwaitingImages {
                    return Ok(());
                }
                self.with_metrics(LayoutMetrics::record_resize_trigger);
                self.schedule_recompute(event);
            }
            HostEvent::ItemResized(item) => {
                if !self.tracker.is_observing(item) {
                    return Ok(());
                }
                self.with_metrics(LayoutMetrics::record_size_change_trigger);
                self.schedule_recompute(event);
            }
            HostEvent::ImageSettled { image, outcome } => {
                let status = match self.gate.as_mut() {
                    Some(gate) => gate.settle(image),
                    None => return Ok(()),
                };
                self.log(
                    LogLevel::Debug,
                    GATE_TARGET,
                    "image_settled",
                    [
                        json_kv("image", json!(image.0)),
                        json_kv("outcome", json!(format!("{outcome:?}").to_lowercase())),
                    ],
                );
                if status == GateStatus::Released {
                    self.release_gate();
                }
            }
        }
        Ok(())
    }

    /// Fire due timers. Returns the number of layout passes that ran.
    pub fn poll(&mut self) -> Result<usize> {
        self.ensure_live()?;
        let mut passes = 0;
        for (handle, task) in self.queue.take_due() {
            match task {
                SessionTask::Recompute => {
                    if self.debouncer.acknowledge(handle) {
                        self.run_pass();
                        passes += 1;
                    }
                }
            }
        }
        Ok(passes)
    }

    /// Tear down timers, observers and listeners. Idempotent; the session
    /// rejects every later operation with [`MasonryError::Disposed`].
    pub fn dispose(&mut self) {
        if self.state == SessionState::Disposed {
            return;
        }

        self.debouncer.cancel(&mut self.queue);
        self.queue.clear();
        self.tracker.detach_all(&mut self.surface);
        if let Some(gate) = self.gate.take() {
            for image in gate.watched() {
                self.surface.unwatch_image(*image);
            }
        }
        if self.options.bind_on_scroll {
            self.surface.unbind_resize();
        }
        self.on_init = None;
        self.on_layout_complete = None;
        self.state = SessionState::Disposed;

        self.audit_stage(SessionAuditStage::Disposed, std::iter::empty());
        self.log(LogLevel::Info, SESSION_TARGET, "disposed", std::iter::empty());
        self.emit_metrics();
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state == SessionState::Disposed {
            Err(MasonryError::Disposed)
        } else {
            Ok(())
        }
    }

    fn schedule_recompute(&mut self, cause: HostEvent) {
        let trigger = self
            .debouncer
            .trigger(&mut self.queue, SessionTask::Recompute);
        let coalesced = matches!(trigger, Trigger::Coalesced(_));
        if coalesced {
            self.with_metrics(LayoutMetrics::record_coalesced);
        }
        let fields = [
            json_str("cause", cause.describe()),
            json_kv("coalesced", json!(coalesced)),
            json_kv(
                "quiet_period_ms",
                json!(self.debouncer.quiet_period().as_millis() as u64),
            ),
        ];
        self.audit_stage(SessionAuditStage::TriggerScheduled, fields.clone());
        self.log(LogLevel::Debug, SESSION_TARGET, "recompute_scheduled", fields);
    }

    fn arm_gate(&mut self) {
        let loading = self.options.loading_class.clone();
        self.surface.add_class(&loading);

        let mut gate = ImageGate::arm(&self.surface.images());
        for image in gate.watched() {
            self.surface.watch_image(*image);
        }
        self.state = SessionState::AwaitingImages;

        let fields = [
            json_kv("images", json!(gate.total())),
            json_kv("outstanding", json!(gate.outstanding())),
        ];
        self.audit_stage(SessionAuditStage::GateArmed, fields.clone());
        self.log(LogLevel::Info, GATE_TARGET, "images_pending", fields);

        let status = gate.release_if_ready();
        self.gate = Some(gate);
        if status == GateStatus::Released {
            self.release_gate();
        }
    }

    fn release_gate(&mut self) {
        if let Some(gate) = self.gate.take() {
            for image in gate.watched() {
                self.surface.unwatch_image(*image);
            }
            self.audit_stage(
                SessionAuditStage::GateReleased,
                [json_kv("images", json!(gate.total()))],
            );
            self.log(
                LogLevel::Info,
                GATE_TARGET,
                "images_settled",
                [json_kv("images", json!(gate.total()))],
            );
        }

        let loading = self.options.loading_class.clone();
        let loaded = self.options.loaded_class.clone();
        self.surface.remove_class(&loading);
        self.surface.add_class(&loaded);

        self.run_pass();
        self.finish_init();
    }

    fn finish_init(&mut self) {
        if let Some(hook) = self.on_init.take() {
            hook();
        }
    }

    /// Reset, resolve, partition, compute, commit, notify.
    fn run_pass(&mut self) -> &LayoutResult {
        let measured_width = if self.options.use_container_width {
            self.surface.container_width()
        } else {
            self.surface.viewport_width()
        };
        let columns = self
            .options
            .column_breakpoints
            .resolve(measured_width, self.options.columns);
        let gutter = self.options.gutter();
        let width = Length::column_width(columns, &gutter);

        let item_count = self.surface.item_count();
        for item in 0..item_count {
            self.surface.reset_item(item, &width);
        }
        self.surface.set_container_height(None);

        let items: Vec<ItemIndex> = (0..item_count).collect();
        let rows = layout::partition(&items, columns);
        let result = layout::compute(&rows, &gutter, columns, &self.surface);
        result.commit(&mut self.surface);

        let digest = result.digest();
        let unchanged = self
            .last_result
            .as_ref()
            .is_some_and(|previous| previous.digest() == digest);
        self.with_metrics(|metrics| metrics.record_pass(item_count, unchanged));

        if self.tracker.is_active() {
            self.attach_observers();
        }

        if self.gate.is_none() {
            self.state = SessionState::LaidOut;
        }

        let fields = [
            json_kv("columns", json!(columns.get())),
            json_kv("items", json!(item_count)),
            json_kv("rows", json!(rows.len())),
            json_kv("container_height_px", json!(result.container_height_px)),
            json_str("digest", digest.to_hex().to_string()),
            json_kv("unchanged", json!(unchanged)),
        ];
        self.audit_stage(SessionAuditStage::PassCommitted, fields.clone());
        self.log(LogLevel::Info, SESSION_TARGET, "layout_committed", fields);

        if let Some(hook) = self.on_layout_complete.as_mut() {
            hook(&result);
        }

        self.last_result.insert(result)
    }

    fn attach_observers(&mut self) {
        match self.tracker.reattach(&mut self.surface) {
            Ok(observed) => {
                self.audit_stage(
                    SessionAuditStage::ObserversAttached,
                    [json_kv("items", json!(observed))],
                );
            }
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    TRACKING_TARGET,
                    "size_observation_unsupported",
                    [json_kv("error", json!(err.to_string()))],
                );
            }
        }
    }

    fn with_metrics(&self, record: impl FnOnce(&mut LayoutMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.logger.as_ref(), self.metrics_snapshot()) {
            let _ = logger.log_event(snapshot.to_log_event(METRICS_TARGET));
        }
    }

    fn log<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(level, target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn audit_stage<I>(&self, stage: SessionAuditStage, details: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(audit) = self.audit.as_ref() {
            let builder = details.into_iter().fold(
                SessionAuditEventBuilder::new(stage, self.queue.now()),
                |builder, (key, value)| builder.detail(key, value),
            );
            audit.record(builder.finish());
        }
    }
}

impl<S: Surface> Drop for MasonrySession<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::runtime::audit::BufferedSessionAudit;
    use crate::runtime::scheduler::ManualClock;
    use crate::surface::{ImageState, ItemSizing, MemorySurface};
    use std::cell::Cell;
    use std::rc::Rc;

    fn surface() -> MemorySurface {
        MemorySurface::new(1000.0).with_fixed_heights([100.0, 80.0, 120.0, 60.0, 50.0])
    }

    fn options() -> MasonryOptions {
        MasonryOptions::new().with_columns(2).unwrap()
    }

    #[test]
    fn detached_container_fails_construction() {
        let err = MasonrySession::new(MemorySurface::detached(), options())
            .err()
            .unwrap();
        assert!(matches!(err, MasonryError::ContainerNotFound));
    }

    #[test]
    fn construction_lays_out_and_binds_resize() {
        let session = MasonrySession::new(surface(), options()).unwrap();
        assert_eq!(session.state(), SessionState::LaidOut);
        assert!(session.surface().is_resize_bound());
        assert_eq!(
            session.surface().container_position(),
            crate::geometry::PositionMode::Relative
        );
        let item = session.surface().item(1).unwrap();
        assert_eq!(item.position, crate::geometry::PositionMode::Absolute);
        assert_eq!(item.left.as_ref().unwrap().to_string(), "calc(490px + 10px)");
    }

    #[test]
    fn resize_binding_can_be_disabled() {
        let clock = ManualClock::new();
        let mut session = MasonryBuilder::new(options().bind_on_scroll(false))
            .clock(clock.clone())
            .build(surface())
            .unwrap();
        assert!(!session.surface().is_resize_bound());
        session.notify(HostEvent::Resize).unwrap();
        assert!(!session.is_recompute_pending());
    }

    #[test]
    fn on_init_runs_once_and_layout_hook_every_pass() {
        let inits = Rc::new(Cell::new(0));
        let passes = Rc::new(Cell::new(0));
        let (i, p) = (inits.clone(), passes.clone());
        let mut session = MasonryBuilder::new(options())
            .clock(ManualClock::new())
            .on_init(move || i.set(i.get() + 1))
            .on_layout_complete(move |_| p.set(p.get() + 1))
            .build(surface())
            .unwrap();
        session.recompute().unwrap();
        session.recompute().unwrap();
        assert_eq!(inits.get(), 1);
        assert_eq!(passes.get(), 3);
    }

    #[test]
    fn resize_burst_runs_a_single_pass() {
        let clock = ManualClock::new();
        let mut session = MasonryBuilder::new(options())
            .clock(clock.clone())
            .enable_metrics()
            .build(surface())
            .unwrap();

        for _ in 0..6 {
            session.notify(HostEvent::Resize).unwrap();
            clock.advance(Duration::from_millis(5));
            assert_eq!(session.poll().unwrap(), 0);
        }
        assert_eq!(session.next_deadline(), Some(Duration::from_millis(50)));
        clock.advance(Duration::from_millis(20));
        assert_eq!(session.poll().unwrap(), 1);
        assert_eq!(session.poll().unwrap(), 0);

        let snapshot = session.metrics_snapshot().unwrap();
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.resize_triggers, 6);
        assert_eq!(snapshot.coalesced_triggers, 5);
        assert_eq!(snapshot.unchanged_passes, 1);
    }

    #[test]
    fn manual_recompute_drops_the_pending_trigger() {
        let clock = ManualClock::new();
        let mut session = MasonryBuilder::new(options())
            .clock(clock.clone())
            .build(surface())
            .unwrap();
        session.notify(HostEvent::Resize).unwrap();
        session.recompute().unwrap();
        assert!(!session.is_recompute_pending());
        clock.advance(Duration::from_secs(1));
        assert_eq!(session.poll().unwrap(), 0);
    }

    #[test]
    fn image_gate_holds_the_first_pass() {
        let surface = surface()
            .with_image(Some("a.png"), ImageState::Loaded)
            .with_image(Some("b.png"), ImageState::Pending);
        let audit = BufferedSessionAudit::new();
        let mut session = MasonryBuilder::new(options().init_on_image_load(true))
            .clock(ManualClock::new())
            .audit(audit.clone())
            .build(surface)
            .unwrap();

        assert_eq!(session.state(), SessionState::AwaitingImages);
        assert!(session.last_result().is_none());
        assert!(session.surface().has_class("masonry--loading"));
        assert_eq!(session.surface().watched_images(), vec![ImageId(1)]);

        session.notify(HostEvent::Resize).unwrap();
        assert!(!session.is_recompute_pending());

        session
            .notify(HostEvent::ImageSettled {
                image: ImageId(1),
                outcome: ImageOutcome::Errored,
            })
            .unwrap();
        assert_eq!(session.state(), SessionState::LaidOut);
        assert!(session.last_result().is_some());
        assert!(!session.surface().has_class("masonry--loading"));
        assert!(session.surface().has_class("masonry--loaded"));
        assert!(session.surface().watched_images().is_empty());
        assert_eq!(
            audit.stages(),
            vec![
                SessionAuditStage::Constructed,
                SessionAuditStage::GateArmed,
                SessionAuditStage::GateReleased,
                SessionAuditStage::PassCommitted,
            ]
        );
    }

    #[test]
    fn settled_images_release_the_gate_at_construction() {
        let surface = surface().with_image(Some("a.png"), ImageState::Loaded);
        let session = MasonryBuilder::new(options().init_on_image_load(true))
            .clock(ManualClock::new())
            .build(surface)
            .unwrap();
        assert_eq!(session.state(), SessionState::LaidOut);
        assert!(session.surface().has_class("masonry--loaded"));
    }

    #[test]
    fn size_tracking_follows_the_item_set() {
        let clock = ManualClock::new();
        let mut session = MasonryBuilder::new(options().track_item_size_changes(true))
            .clock(clock.clone())
            .build(surface())
            .unwrap();
        assert_eq!(session.surface().observed_items(), vec![0, 1, 2, 3, 4]);

        session.surface_mut().push_item(ItemSizing::Fixed(30.0));
        session.notify(HostEvent::ItemResized(2)).unwrap();
        clock.advance(Duration::from_millis(25));
        assert_eq!(session.poll().unwrap(), 1);
        assert_eq!(session.surface().observed_items(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn untracked_item_events_are_ignored() {
        let mut session = MasonryBuilder::new(options())
            .clock(ManualClock::new())
            .build(surface())
            .unwrap();
        session.notify(HostEvent::ItemResized(0)).unwrap();
        assert!(!session.is_recompute_pending());
    }

    #[test]
    fn missing_size_observation_only_warns() {
        let sink = MemorySink::new();
        let mut session = MasonryBuilder::new(options().track_item_size_changes(true))
            .clock(ManualClock::new())
            .logger(Logger::new(sink.clone()))
            .build(surface().without_size_observation())
            .unwrap();
        session.recompute().unwrap();

        assert_eq!(session.state(), SessionState::LaidOut);
        assert_eq!(sink.count("size_observation_unsupported"), 1);
        let warning = sink
            .events()
            .into_iter()
            .find(|event| event.message == "size_observation_unsupported")
            .unwrap();
        assert_eq!(warning.level, LogLevel::Warn);
        assert_eq!(warning.target, TRACKING_TARGET);
    }

    #[test]
    fn dispose_cancels_timers_and_unregisters_everything() {
        let clock = ManualClock::new();
        let mut session = MasonryBuilder::new(
            options()
                .track_item_size_changes(true)
                .init_on_image_load(true),
        )
        .clock(clock.clone())
        .build(surface().with_image(Some("slow.png"), ImageState::Pending))
        .unwrap();
        assert_eq!(session.surface().watched_images(), vec![ImageId(0)]);

        session.dispose();
        session.dispose();

        assert_eq!(session.state(), SessionState::Disposed);
        assert!(session.surface().watched_images().is_empty());
        assert!(session.surface().observed_items().is_empty());
        assert!(!session.surface().is_resize_bound());
        assert_eq!(session.next_deadline(), None);
        assert!(matches!(session.recompute(), Err(MasonryError::Disposed)));
        assert!(matches!(
            session.notify(HostEvent::Resize),
            Err(MasonryError::Disposed)
        ));
        assert!(matches!(session.poll(), Err(MasonryError::Disposed)));
    }

    #[test]
    fn dispose_with_a_pending_trigger_never_lays_out_again() {
        let clock = ManualClock::new();
        let passes = Rc::new(Cell::new(0));
        let p = passes.clone();
        let mut session = MasonryBuilder::new(options().track_item_size_changes(true))
            .clock(clock.clone())
            .on_layout_complete(move |_| p.set(p.get() + 1))
            .build(surface())
            .unwrap();
        session.notify(HostEvent::Resize).unwrap();
        session.dispose();
        clock.advance(Duration::from_secs(1));
        assert!(session.poll().is_err());
        assert_eq!(passes.get(), 1);
        assert!(session.surface().observed_items().is_empty());
    }

    #[test]
    fn container_width_mode_drives_breakpoints() {
        let options = options()
            .with_breakpoint(600, 1)
            .unwrap()
            .use_container_width(true);
        let surface = MemorySurface::new(500.0)
            .with_viewport(1400.0, 900.0)
            .with_fixed_heights([10.0, 10.0]);
        let session = MasonrySession::new(surface, options).unwrap();
        assert_eq!(session.last_result().unwrap().columns.get(), 1);
    }

    #[test]
    fn logs_the_lifecycle() {
        let sink = MemorySink::new();
        let mut session = MasonryBuilder::new(options())
            .clock(ManualClock::new())
            .logger(Logger::new(sink.clone()))
            .enable_metrics()
            .build(surface())
            .unwrap();
        session.dispose();
        assert_eq!(
            sink.messages(),
            vec![
                "session_constructed".to_string(),
                "layout_committed".to_string(),
                "disposed".to_string(),
                "layout_metrics".to_string(),
            ]
        );
    }
}
