use controller::{MapController, MapEvent};
use foundation::time::Time;
use layers::{GLOW_BLUR_STD_DEV, GLOW_FILTER_ID, Legend};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

const TOOLTIP_STYLE: &str = "position:absolute;pointer-events:none;padding:8px 10px;\
border-radius:8px;font-size:12px;background:rgba(15,23,42,0.9);color:#fff;\
box-shadow:0 8px 24px rgba(0,0,0,0.35);";

/// SVG and HTML nodes owned by the map.
pub struct MapDom {
    document: Document,
    svg: Element,
    layer: Element,
    tooltip: Element,
    /// `#country-info`, when the page has one.
    panel: Option<Element>,
    paths: Vec<Element>,
    /// Shapes whose outline is still animating.
    outline_dirty: Vec<usize>,
    last_hovered: Option<usize>,
}

impl MapDom {
    /// Empties `container` and builds the tooltip, SVG root, map layer and
    /// legend inside it.
    pub fn mount(document: Document, container: &Element, controller: &MapController) -> Result<Self, JsValue> {
        container.set_inner_html("");
        let config = controller.config();

        let tooltip = document.create_element("div")?;
        tooltip.set_attribute("class", "map-tooltip")?;
        tooltip.set_attribute("style", &format!("{TOOLTIP_STYLE}opacity:0;"))?;
        container.append_child(&tooltip)?;

        let svg = svg_element(&document, "svg")?;
        svg.set_attribute("class", "world-svg")?;
        svg.set_attribute("width", "100%")?;
        svg.set_attribute("height", "100%")?;
        svg.set_attribute("viewBox", &format!("0 0 {} {}", config.width, config.height))?;
        svg.set_attribute(
            "style",
            "background:linear-gradient(135deg, #0b1220 0%, #0f172a 100%)",
        )?;
        container.append_child(&svg)?;

        let layer = svg_element(&document, "g")?;
        layer.set_attribute("class", "map-layer")?;
        svg.append_child(&layer)?;

        mount_legend(&document, &svg, &Legend::default())?;

        let panel = document.get_element_by_id("country-info");
        Ok(Self {
            document,
            svg,
            layer,
            tooltip,
            panel,
            paths: Vec::new(),
            outline_dirty: Vec::new(),
            last_hovered: None,
        })
    }

    /// Applies the controller's pending events to the DOM.
    pub fn apply_events(&mut self, controller: &mut MapController) -> Result<(), JsValue> {
        for event in controller.drain_events() {
            match event {
                MapEvent::DatasetLoaded { .. } => self.build_paths(controller)?,
                MapEvent::Fallback { reason } => {
                    web_sys::console::warn_1(&JsValue::from_str(&format!(
                        "World GeoJSON failed to load; using fallback background. {reason}"
                    )));
                    self.build_fallback(controller)?;
                }
                MapEvent::HoverChanged { index } => {
                    if let Some(prev) = self.last_hovered {
                        self.mark_outline(prev);
                    }
                    if let Some(i) = index {
                        self.mark_outline(i);
                        self.show_tooltip(controller)?;
                    }
                    self.last_hovered = index;
                }
                MapEvent::TooltipMoved { .. } => self.position_tooltip(controller)?,
                MapEvent::Raised { index } => {
                    if let Some(path) = self.paths.get(index) {
                        self.layer.append_child(path)?;
                    }
                }
                MapEvent::PanelShown { .. } => {
                    if let (Some(panel), Some(html)) = (&self.panel, controller.panel().to_html()) {
                        panel.set_inner_html(&html);
                    }
                }
                MapEvent::SelectionChanged { .. }
                | MapEvent::TransitionStarted { .. }
                | MapEvent::ViewChanged { .. } => {}
            }
        }
        Ok(())
    }

    /// Writes everything that animates: view, outlines, tooltip and panel
    /// opacity.
    pub fn render_frame(&mut self, controller: &MapController, now: Time) -> Result<(), JsValue> {
        self.layer
            .set_attribute("transform", &controller.view().to_svg())?;

        let mut still_dirty = Vec::with_capacity(self.outline_dirty.len());
        for &i in &self.outline_dirty {
            let (Some(shape), Some(path)) = (controller.shape(i), self.paths.get(i)) else {
                continue;
            };
            path.set_attribute("stroke-width", &format!("{:.3}", shape.outline_width(now)))?;
            if !shape.outline_settled(now) {
                still_dirty.push(i);
            }
        }
        self.outline_dirty = still_dirty;

        let tooltip = controller.tooltip();
        if tooltip.content().is_some() {
            self.position_tooltip(controller)?;
        }
        if let Some(panel) = &self.panel {
            if controller.panel().record().is_some() {
                panel.set_attribute(
                    "style",
                    &format!("opacity:{:.3}", controller.panel().opacity(now)),
                )?;
            }
        }
        Ok(())
    }

    fn mark_outline(&mut self, index: usize) {
        if !self.outline_dirty.contains(&index) {
            self.outline_dirty.push(index);
        }
    }

    fn build_paths(&mut self, controller: &MapController) -> Result<(), JsValue> {
        self.layer.set_inner_html("");
        self.paths.clear();
        self.outline_dirty.clear();
        self.last_hovered = None;
        let now = controller.now();
        for (i, shape) in controller.shapes().iter().enumerate() {
            let style = shape.style(now);
            let path = svg_element(&self.document, "path")?;
            path.set_attribute("class", "country")?;
            path.set_attribute("data-index", &i.to_string())?;
            path.set_attribute("d", &shape.path)?;
            path.set_attribute("fill", &style.fill.to_hex())?;
            path.set_attribute("stroke", style.stroke)?;
            path.set_attribute("stroke-width", &style.stroke_width.to_string())?;
            path.set_attribute("cursor", style.cursor.as_css())?;
            if style.glow {
                path.set_attribute("filter", &format!("url(#{GLOW_FILTER_ID})"))?;
            }
            self.layer.append_child(&path)?;
            self.paths.push(path);
        }
        self.mount_glow_filter()
    }

    fn build_fallback(&mut self, controller: &MapController) -> Result<(), JsValue> {
        self.layer.set_inner_html("");
        self.paths.clear();
        let Some((rect, color)) = controller.fallback_background() else {
            return Ok(());
        };
        let bg = svg_element(&self.document, "rect")?;
        bg.set_attribute("x", &rect.min[0].to_string())?;
        bg.set_attribute("y", &rect.min[1].to_string())?;
        bg.set_attribute("width", &rect.width().to_string())?;
        bg.set_attribute("height", &rect.height().to_string())?;
        bg.set_attribute("fill", &color.to_hex())?;
        self.layer.append_child(&bg)?;
        Ok(())
    }

    fn mount_glow_filter(&self) -> Result<(), JsValue> {
        if self.document.get_element_by_id(GLOW_FILTER_ID).is_some() {
            return Ok(());
        }
        let defs = svg_element(&self.document, "defs")?;
        let filter = svg_element(&self.document, "filter")?;
        filter.set_attribute("id", GLOW_FILTER_ID)?;
        let blur = svg_element(&self.document, "feGaussianBlur")?;
        blur.set_attribute("stdDeviation", &GLOW_BLUR_STD_DEV.to_string())?;
        blur.set_attribute("result", "coloredBlur")?;
        filter.append_child(&blur)?;
        let merge = svg_element(&self.document, "feMerge")?;
        for input in ["coloredBlur", "SourceGraphic"] {
            let node = svg_element(&self.document, "feMergeNode")?;
            node.set_attribute("in", input)?;
            merge.append_child(&node)?;
        }
        filter.append_child(&merge)?;
        defs.append_child(&filter)?;
        self.svg.append_child(&defs)?;
        Ok(())
    }

    fn show_tooltip(&self, controller: &MapController) -> Result<(), JsValue> {
        if let Some(content) = controller.tooltip().content() {
            self.tooltip.set_inner_html(&content.to_html());
        }
        self.position_tooltip(controller)
    }

    fn position_tooltip(&self, controller: &MapController) -> Result<(), JsValue> {
        let tooltip = controller.tooltip();
        let pos = tooltip.position();
        self.tooltip.set_attribute(
            "style",
            &format!(
                "{TOOLTIP_STYLE}left:{}px;top:{}px;opacity:{:.3};",
                pos.x,
                pos.y,
                tooltip.opacity(controller.now())
            ),
        )
    }
}

fn svg_element(document: &Document, name: &str) -> Result<Element, JsValue> {
    document.create_element_ns(Some(SVG_NS), name)
}

fn mount_legend(document: &Document, svg: &Element, legend: &Legend) -> Result<(), JsValue> {
    let group = svg_element(document, "g")?;
    group.set_attribute("class", "map-legend")?;
    group.set_attribute(
        "transform",
        &format!("translate({},{})", legend.origin.x, legend.origin.y),
    )?;
    for (i, item) in legend.items.iter().enumerate() {
        let offset = legend.row_origin(i) - legend.origin;
        let row = svg_element(document, "g")?;
        row.set_attribute("transform", &format!("translate(0, {})", offset.y))?;

        let swatch = svg_element(document, "rect")?;
        swatch.set_attribute("width", &legend.swatch_size.to_string())?;
        swatch.set_attribute("height", &legend.swatch_size.to_string())?;
        swatch.set_attribute("rx", &legend.swatch_radius.to_string())?;
        swatch.set_attribute("fill", &item.color.to_hex())?;
        swatch.set_attribute("stroke", "rgba(255,255,255,0.2)")?;
        row.append_child(&swatch)?;

        let label = svg_element(document, "text")?;
        label.set_attribute("x", &legend.label_offset.x.to_string())?;
        label.set_attribute("y", &legend.label_offset.y.to_string())?;
        label.set_attribute("fill", "#e2e8f0")?;
        label.set_attribute("font-size", "12")?;
        label.set_attribute("font-weight", "500")?;
        label.set_text_content(Some(item.label));
        row.append_child(&label)?;

        group.append_child(&row)?;
    }
    svg.append_child(&group)?;
    Ok(())
}
