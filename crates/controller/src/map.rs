use std::sync::Arc;

use formats::{BoundaryDataset, SkippedFeature};
use foundation::bounds::Aabb2;
use foundation::math::{NaturalEarth1, Vec2};
use foundation::time::Time;
use layers::{Color, FALLBACK_BACKGROUND};
use registry::Registry;
use runtime::EventBus;
use scene::picking::pick_topmost;
use scene::{ViewTransform, WheelMode, ZoomBehavior, ZoomTransition};
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::error::{FetchError, LoadError};
use crate::event::MapEvent;
use crate::panel::DetailsPanel;
use crate::shape::ShapeState;
use crate::tooltip::{TooltipContent, TooltipState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    /// Waiting for the dataset.
    Pending,
    Ready,
    Fallback { reason: String },
}

/// Interaction state of the world map.
///
/// The host feeds pointer input and clock ticks in; everything it needs to
/// draw is read back out. All calls are synchronous.
pub struct MapController {
    config: MapConfig,
    registry: Arc<Registry>,
    zoom: ZoomBehavior,
    projection: NaturalEarth1,
    status: MapStatus,
    shapes: Vec<ShapeState>,
    /// Shape indices, back to front.
    draw_order: Vec<usize>,
    skipped: Vec<SkippedFeature>,
    view: ViewTransform,
    transition: Option<ZoomTransition>,
    selected: Option<usize>,
    hovered: Option<usize>,
    tooltip: TooltipState,
    panel: DetailsPanel,
    events: EventBus<MapEvent>,
    now: Time,
}

impl MapController {
    pub fn new(registry: Arc<Registry>, config: MapConfig) -> Self {
        Self {
            zoom: config.zoom_behavior(),
            config,
            registry,
            projection: NaturalEarth1::default(),
            status: MapStatus::Pending,
            shapes: Vec::new(),
            draw_order: Vec::new(),
            skipped: Vec::new(),
            view: ViewTransform::identity(),
            transition: None,
            selected: None,
            hovered: None,
            tooltip: TooltipState::default(),
            panel: DetailsPanel::default(),
            events: EventBus::new(),
            now: Time::ZERO,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn projection(&self) -> &NaturalEarth1 {
        &self.projection
    }

    pub fn shapes(&self) -> &[ShapeState] {
        &self.shapes
    }

    pub fn shape(&self, index: usize) -> Option<&ShapeState> {
        self.shapes.get(index)
    }

    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    pub fn skipped(&self) -> &[SkippedFeature] {
        &self.skipped
    }

    /// The transform currently applied to the map layer.
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    /// Where the view is heading; equal to `view()` when idle.
    pub fn target_view(&self) -> ViewTransform {
        self.transition.map_or(self.view, |t| t.target())
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub fn panel(&self) -> &DetailsPanel {
        &self.panel
    }

    pub fn now(&self) -> Time {
        self.now
    }

    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain()
    }

    /// Full-viewport background to draw instead of countries.
    pub fn fallback_background(&self) -> Option<(Aabb2, Color)> {
        match self.status {
            MapStatus::Fallback { .. } => Some((self.config.viewport(), FALLBACK_BACKGROUND)),
            _ => None,
        }
    }

    /// Builds the map from the fetched dataset, or switches to the fallback
    /// background when fetching or parsing failed. Replaces any previous
    /// map. Returns the number of shapes drawn.
    pub fn load_dataset(&mut self, fetched: Result<&str, FetchError>) -> Result<usize, LoadError> {
        self.teardown();
        match self.build_shapes(fetched) {
            Ok(count) => {
                self.status = MapStatus::Ready;
                info!(
                    shapes = count,
                    skipped = self.skipped.len(),
                    "world map ready"
                );
                self.events.emit(MapEvent::DatasetLoaded {
                    shapes: count,
                    skipped: self.skipped.len(),
                });
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "world dataset failed to load; using fallback background");
                self.teardown();
                let reason = err.to_string();
                self.status = MapStatus::Fallback {
                    reason: reason.clone(),
                };
                self.events.emit(MapEvent::Fallback { reason });
                Err(err)
            }
        }
    }

    fn build_shapes(&mut self, fetched: Result<&str, FetchError>) -> Result<usize, LoadError> {
        let payload = fetched?;
        let dataset = BoundaryDataset::from_geojson_str(payload, &self.config.name_property)?;
        let mut projection = NaturalEarth1::default();
        projection.fit_extent(self.config.fit_extent(), dataset.coordinates())?;

        let BoundaryDataset { features, skipped } = dataset;
        for feature in &features {
            let record = self.registry.lookup_shared(&feature.name).cloned();
            let projected = layers::project_feature(&projection, feature);
            self.shapes.push(ShapeState::new(
                feature.name.clone(),
                record,
                projected,
                self.config.outline_width,
            ));
        }
        self.draw_order = (0..self.shapes.len()).collect();
        self.skipped = skipped;
        self.projection = projection;
        Ok(self.shapes.len())
    }

    fn teardown(&mut self) {
        self.shapes.clear();
        self.draw_order.clear();
        self.skipped.clear();
        self.hovered = None;
        self.selected = None;
        self.tooltip.clear();
        self.panel.clear();
        self.transition = None;
        self.view = ViewTransform::identity();
        self.status = MapStatus::Pending;
    }

    pub fn pointer_enter(&mut self, index: usize, pos: Vec2) {
        if index >= self.shapes.len() {
            debug!(index, "pointer entered unknown shape");
            return;
        }
        if let Some(prev) = self.hovered.filter(|&prev| prev != index) {
            self.pointer_leave(prev);
        }

        let durations = &self.config.durations;
        let shape = &mut self.shapes[index];
        shape.set_hovered(true, self.config.outline_hover_width, self.now, durations.hover_ms);
        let content = TooltipContent::for_shape(&shape.feature_name, shape.record.as_deref());
        self.tooltip.show(content, pos, self.config.tooltip_offset);
        self.hovered = Some(index);
        self.raise(index);
        self.events.emit(MapEvent::HoverChanged {
            index: Some(index),
        });
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.hovered.is_none() {
            return;
        }
        self.tooltip.move_to(pos, self.config.tooltip_offset);
        self.events.emit(MapEvent::TooltipMoved {
            position: self.tooltip.position(),
        });
    }

    pub fn pointer_leave(&mut self, index: usize) {
        if self.hovered != Some(index) {
            return;
        }
        let durations = &self.config.durations;
        if let Some(shape) = self.shapes.get_mut(index) {
            shape.set_hovered(false, self.config.outline_width, self.now, durations.hover_ms);
        }
        self.tooltip.hide(self.now, durations.tooltip_ms);
        self.hovered = None;
        self.events.emit(MapEvent::HoverChanged { index: None });
    }

    fn raise(&mut self, index: usize) {
        if self.draw_order.last() == Some(&index) {
            return;
        }
        self.draw_order.retain(|&i| i != index);
        self.draw_order.push(index);
        self.events.emit(MapEvent::Raised { index });
    }

    /// Registered country: show its details and zoom to it. Anything else:
    /// clear the selection and zoom back out.
    pub fn click(&mut self, index: usize) {
        let Some(shape) = self.shapes.get(index) else {
            debug!(index, "click on unknown shape");
            return;
        };

        match shape.record.clone() {
            Some(record) => {
                let target = self
                    .zoom
                    .zoom_to_bounds(&shape.projected.bounds, self.config.zoom_fit);
                debug!(country = %record.name, k = target.k, "zooming to country");
                self.events.emit(MapEvent::PanelShown {
                    name: record.name.clone(),
                });
                self.panel
                    .show(record, self.now, self.config.durations.panel_ms);
                self.select(Some(index));
                self.start_transition(target, self.config.durations.zoom_ms);
            }
            None => {
                self.select(None);
                self.reset_view();
            }
        }
    }

    /// Animates back to the identity transform.
    pub fn reset_view(&mut self) {
        self.start_transition(ViewTransform::identity(), self.config.durations.reset_ms);
    }

    fn select(&mut self, index: Option<usize>) {
        if self.selected == index {
            return;
        }
        if let Some(prev) = self.selected.and_then(|i| self.shapes.get_mut(i)) {
            prev.set_selected(false);
        }
        if let Some(shape) = index.and_then(|i| self.shapes.get_mut(i)) {
            shape.set_selected(true);
        }
        debug!(?index, "selection changed");
        self.selected = index;
        self.events.emit(MapEvent::SelectionChanged { index });
    }

    fn start_transition(&mut self, target: ViewTransform, duration_ms: f64) {
        let from = self.current_view();
        self.transition = Some(ZoomTransition::new(
            from,
            target,
            &self.zoom.viewport,
            (self.zoom.min_scale, self.zoom.max_scale),
            self.now,
            duration_ms,
        ));
        self.view = from;
        self.events.emit(MapEvent::TransitionStarted { target });
    }

    fn current_view(&self) -> ViewTransform {
        self.transition.map_or(self.view, |t| t.sample(self.now))
    }

    /// Stops a running transition where it currently is.
    fn interrupt(&mut self) {
        if self.transition.is_some() {
            self.view = self.current_view();
            self.transition = None;
        }
    }

    /// Zooms about `pointer` (screen space) by one wheel event.
    pub fn wheel(&mut self, pointer: Vec2, delta_y: f64, mode: WheelMode, ctrl_key: bool) {
        self.interrupt();
        self.set_view(self.zoom.wheel(self.view, pointer, delta_y, mode, ctrl_key));
    }

    /// Pans by a pointer drag of `delta` screen units.
    pub fn drag(&mut self, delta: Vec2) {
        self.interrupt();
        self.set_view(self.zoom.pan(self.view, delta));
    }

    fn set_view(&mut self, view: ViewTransform) {
        if view != self.view {
            self.view = view;
            self.events.emit(MapEvent::ViewChanged { view });
        }
    }

    /// Topmost shape under a screen-space point.
    pub fn shape_at(&self, screen: Vec2) -> Option<usize> {
        let p = self.view.invert(screen);
        pick_topmost(&self.shapes, &self.draw_order, p)
    }

    /// Moves the clock to `now` and samples the running transition. The
    /// target transform is installed exactly once the transition ends.
    pub fn advance(&mut self, now: Time) -> ViewTransform {
        if now > self.now {
            self.now = now;
        }
        if let Some(t) = self.transition {
            let view = t.sample(self.now);
            if t.is_finished(self.now) {
                self.transition = None;
            }
            self.set_view(view);
        }
        self.view
    }
}

impl std::fmt::Debug for MapController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapController")
            .field("status", &self.status)
            .field("shapes", &self.shapes.len())
            .field("view", &self.view)
            .field("selected", &self.selected)
            .field("hovered", &self.hovered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{MapController, MapStatus};
    use crate::config::MapConfig;
    use crate::error::{FetchError, LoadError};
    use crate::event::MapEvent;
    use crate::shape::ShapePhase;
    use foundation::math::Vec2;
    use foundation::time::Time;
    use registry::{Category, CountryEntry, Registry, builtin};
    use scene::{ViewTransform, WheelMode};
    use std::sync::Arc;

    const SAMPLE: &str = include_str!("../../apps/viewer_web/assets/world_sample.geojson");
    const USA: usize = 1;
    const GERMANY: usize = 3;
    const IRELAND: usize = 4;
    const JAPAN: usize = 5;

    fn loaded() -> MapController {
        let registry = Arc::new(builtin::space_programs().unwrap());
        let mut map = MapController::new(registry, MapConfig::default());
        map.load_dataset(Ok(SAMPLE)).unwrap();
        map
    }

    fn center_of(map: &MapController, index: usize) -> Vec2 {
        map.view().apply(map.shape(index).unwrap().projected.bounds.center())
    }

    #[test]
    fn loads_sample_and_skips_malformed_features() {
        let mut map = loaded();
        assert_eq!(map.status(), &MapStatus::Ready);
        assert_eq!(map.shapes().len(), 8);
        assert_eq!(map.skipped().len(), 2);
        assert_eq!(map.draw_order(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(map.fallback_background().is_none());
        assert_eq!(
            map.drain_events(),
            vec![MapEvent::DatasetLoaded {
                shapes: 8,
                skipped: 2
            }]
        );
    }

    #[test]
    fn fills_follow_registry_category() {
        let map = loaded();
        let now = map.now();
        let fill = |i: usize| map.shape(i).unwrap().style(now).fill.to_hex();
        assert_eq!(fill(USA), "#4ade80");
        assert_eq!(fill(IRELAND), "#f87171");
        assert_eq!(fill(GERMANY), "#334155");
        assert_eq!(fill(0), "#334155");

        let germany = map.shape(GERMANY).unwrap();
        assert!(germany.record.is_none());
        assert_eq!(germany.phase(), ShapePhase::Unmatched);
        assert!(!germany.style(now).glow);
        assert!(map.shape(USA).unwrap().style(now).glow);
        assert_eq!(
            map.shape(USA).unwrap().record.as_ref().unwrap().name,
            "United States of America"
        );
    }

    #[test]
    fn fetch_failure_falls_back_to_background() {
        let registry = Arc::new(builtin::space_programs().unwrap());
        let mut map = MapController::new(registry, MapConfig::default());
        let err = map
            .load_dataset(Err(FetchError("HTTP 404".to_string())))
            .unwrap_err();
        assert!(matches!(err, LoadError::Fetch(_)));
        assert!(matches!(map.status(), MapStatus::Fallback { .. }));
        let (rect, color) = map.fallback_background().unwrap();
        assert_eq!((rect.width(), rect.height()), (960.0, 520.0));
        assert_eq!(color.to_hex(), "#0f172a");
        assert!(map.shapes().is_empty());
        assert!(
            map.drain_events()
                .iter()
                .any(|e| matches!(e, MapEvent::Fallback { .. }))
        );
    }

    #[test]
    fn unparseable_dataset_falls_back() {
        let registry = Arc::new(builtin::space_programs().unwrap());
        let mut map = MapController::new(registry, MapConfig::default());
        assert!(matches!(
            map.load_dataset(Ok("<html>")),
            Err(LoadError::Dataset(_))
        ));
        assert!(map.fallback_background().is_some());

        let empty = r#"{ "type": "FeatureCollection", "features": [] }"#;
        assert!(matches!(
            map.load_dataset(Ok(empty)),
            Err(LoadError::Projection(_))
        ));
    }

    #[test]
    fn hover_raises_outlines_and_shows_tooltip() {
        let mut map = loaded();
        map.advance(Time(1.0));
        map.pointer_enter(GERMANY, Vec2::new(300.0, 100.0));

        assert_eq!(map.hovered(), Some(GERMANY));
        assert_eq!(map.draw_order().last(), Some(&GERMANY));
        let tooltip = map.tooltip().content().unwrap();
        assert_eq!(tooltip.title, "Germany");
        assert_eq!(tooltip.hint, "No details available");
        assert_eq!(map.tooltip().position(), Vec2::new(320.0, 120.0));
        assert_eq!(map.shape(GERMANY).unwrap().phase(), ShapePhase::Unmatched);

        map.pointer_move(Vec2::new(10.0, 10.0));
        assert_eq!(map.tooltip().position(), Vec2::new(30.0, 30.0));

        let settled = Time(1.0).after_millis(150.0);
        map.advance(settled);
        assert_eq!(map.shape(GERMANY).unwrap().outline_width(settled), 1.0);

        map.pointer_leave(GERMANY);
        assert!(!map.tooltip().is_shown());
        let later = settled.after_millis(150.0);
        assert_eq!(map.shape(GERMANY).unwrap().outline_width(later), 0.5);
        assert_eq!(map.tooltip().opacity(later), 0.0);
    }

    #[test]
    fn hover_on_registered_country_uses_canonical_name() {
        let mut map = loaded();
        map.pointer_enter(JAPAN, Vec2::ZERO);
        let tooltip = map.tooltip().content().unwrap();
        assert_eq!(tooltip.title, "Japan");
        assert_eq!(tooltip.hint, "Click for details");
        assert_eq!(map.shape(JAPAN).unwrap().phase(), ShapePhase::MatchedHovered);

        // entering another shape leaves the previous one
        map.pointer_enter(USA, Vec2::ZERO);
        assert_eq!(map.shape(JAPAN).unwrap().phase(), ShapePhase::MatchedIdle);
        assert_eq!(map.draw_order().last(), Some(&USA));
    }

    #[test]
    fn click_registered_country_zooms_and_shows_panel() {
        let mut map = loaded();
        map.advance(Time(1.0));
        map.click(USA);

        assert_eq!(map.selected(), Some(USA));
        assert_eq!(map.shape(USA).unwrap().phase(), ShapePhase::MatchedSelected);
        assert_eq!(
            map.panel().record().map(|r| r.category),
            Some(Category::HasAgency)
        );
        assert!(map.panel().to_html().unwrap().contains("NASA"));

        let target = map.target_view();
        assert!(target.k >= 1.0 && target.k <= 8.0);
        assert!(map.is_animating());

        let view = map.advance(Time(1.0).after_millis(750.0));
        assert_eq!(view, target);
        assert!(!map.is_animating());

        // the selected country ends up centered
        let c = center_of(&map, USA);
        assert!((c.x - 480.0).abs() < 1e-9);
        assert!((c.y - 260.0).abs() < 1e-9);
    }

    #[test]
    fn clicking_unregistered_country_resets_to_identity() {
        let mut map = loaded();
        map.advance(Time(1.0));
        map.click(JAPAN);
        map.advance(Time(2.0));
        assert!(map.view().k > 1.0);

        map.click(GERMANY);
        assert_eq!(map.selected(), None);
        assert_eq!(map.shape(JAPAN).unwrap().phase(), ShapePhase::MatchedIdle);
        map.advance(Time(2.3));
        assert!(map.is_animating());

        let view = map.advance(Time(2.0).after_millis(600.0));
        assert_eq!(view, ViewTransform::identity());
        assert_eq!((view.k, view.x, view.y), (1.0, 0.0, 0.0));
    }

    #[test]
    fn alias_scenario_through_the_map() {
        let mut builder = Registry::builder();
        builder
            .register(
                &["USA", "United States"],
                CountryEntry::new("NASA", "", Category::HasAgency),
            )
            .unwrap();
        let registry = Arc::new(builder.build());
        assert_eq!(registry.lookup("usa").unwrap().name, "USA");
        assert_eq!(
            registry.lookup("United   States").unwrap().category,
            Category::HasAgency
        );
        assert!(registry.lookup("Germany").is_none());

        let mut map = MapController::new(registry, MapConfig::default());
        map.load_dataset(Ok(SAMPLE)).unwrap();
        map.pointer_enter(USA, Vec2::ZERO);
        assert_eq!(map.tooltip().content().unwrap().title, "USA");
        assert!(map.shape(IRELAND).unwrap().record.is_none());
    }

    #[test]
    fn wheel_zoom_stays_in_extent_and_cancels_transition() {
        let mut map = loaded();
        map.advance(Time(1.0));
        map.click(USA);
        map.advance(Time(1.2));
        assert!(map.is_animating());

        let pointer = Vec2::new(480.0, 260.0);
        for _ in 0..20 {
            map.wheel(pointer, -300.0, WheelMode::Pixel, false);
        }
        assert!(!map.is_animating());
        assert_eq!(map.view().k, 8.0);

        for _ in 0..20 {
            map.wheel(pointer, 3.0, WheelMode::Line, true);
        }
        assert_eq!(map.view().k, 1.0);
        assert_eq!(map.selected(), Some(USA));
    }

    #[test]
    fn drag_pans_without_touching_selection() {
        let mut map = loaded();
        map.drag(Vec2::new(15.0, -5.0));
        assert_eq!(map.view(), ViewTransform::new(1.0, 15.0, -5.0));
        assert_eq!(map.selected(), None);
    }

    #[test]
    fn hit_testing_follows_the_view() {
        let mut map = loaded();
        let p = center_of(&map, USA);
        assert_eq!(map.shape_at(p), Some(USA));
        assert_eq!(map.shape_at(Vec2::new(-50.0, -50.0)), None);

        map.advance(Time(1.0));
        map.click(USA);
        map.advance(Time(2.0));
        assert_eq!(map.shape_at(Vec2::new(480.0, 260.0)), Some(USA));
    }

    #[test]
    fn reload_tears_down_previous_state() {
        let mut map = loaded();
        map.advance(Time(1.0));
        map.pointer_enter(USA, Vec2::ZERO);
        map.click(USA);
        map.advance(Time(2.0));

        map.load_dataset(Ok(SAMPLE)).unwrap();
        assert_eq!(map.selected(), None);
        assert_eq!(map.hovered(), None);
        assert!(map.tooltip().content().is_none());
        assert!(map.panel().record().is_none());
        assert_eq!(map.view(), ViewTransform::identity());
    }

    #[test]
    fn stray_features_do_not_shrink_the_map() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Japan"},"geometry":{"type":"Polygon","coordinates":[[[130,31],[142,31],[142,41],[130,41],[130,31]]]}},
            {"type":"Feature","properties":{"name":"Bad"},"geometry":{"type":"Polygon","coordinates":[[[0,0],[100000,0],[0,1],[0,0]]]}},
            {"type":"Feature","properties":{"name":"Ireland"},"geometry":{"type":"Polygon","coordinates":[[[-10,52],[-6,55],[-10,52]]]}}
        ]}"#;
        let registry = Arc::new(builtin::space_programs().unwrap());
        let mut map = MapController::new(registry, MapConfig::default());
        assert!(matches!(map.load_dataset(Ok(payload)), Ok(1)));
        assert_eq!(map.skipped().len(), 2);

        let japan = map.shape(0).unwrap();
        assert_eq!(japan.feature_name, "Japan");
        let b = japan.projected.bounds;
        assert!(b.width() > 100.0 && b.height() > 100.0);
        assert!(b.min[0] >= 10.0 - 1e-9 && b.max[0] <= 950.0 + 1e-9);
        assert!(b.min[1] >= 10.0 - 1e-9 && b.max[1] <= 510.0 + 1e-9);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut map = loaded();
        map.pointer_enter(99, Vec2::ZERO);
        map.click(99);
        map.pointer_leave(99);
        assert_eq!(map.hovered(), None);
        assert_eq!(map.selected(), None);
    }
}
