//! Page tree management
//!
//! `PageTree` realizes a [`NodeBuilder`] description into role-tagged
//! elements with absolute document bounds. Layout is computed by Taffy
//! (flexbox) against the viewport width with unbounded height, so the
//! document grows as tall as its content.
//!
//! Each element also carries two visual records. `visual` is the state
//! written by triggered rules, and `ambient` is a layer composed on top by
//! looping rules. Neither affects layout.

use folio_animation::CounterText;
use folio_core::{Rect, VisualState};
use slotmap::{new_key_type, SlotMap};
use taffy::{
    AlignItems, AvailableSpace, Dimension, Display, FlexDirection, FlexWrap, LengthPercentage,
    NodeId, Style, TaffyError, TaffyTree,
};

use crate::role::Role;

new_key_type! {
    pub struct ElementId;
}

/// Width of an average glyph as a fraction of the font size
const GLYPH_WIDTH: f32 = 0.5;

/// Context stored with text nodes for measurement during layout
#[derive(Clone, Debug)]
struct TextMeasureContext {
    chars: usize,
    /// Length of the longest word, the narrowest the text can wrap to
    longest_word: usize,
    font_size: f32,
    line_height: f32,
}

impl TextMeasureContext {
    fn new(content: &str, font_size: f32) -> Self {
        Self {
            chars: content.chars().count(),
            longest_word: content
                .split_whitespace()
                .map(|w| w.chars().count())
                .max()
                .unwrap_or(0),
            font_size,
            line_height: 1.4,
        }
    }
}

/// Measure function for text nodes during Taffy layout
///
/// Estimates wrapped height from a fixed average glyph width. Pixel-exact
/// shaping is out of scope: bounds only need to be stable and monotonic in
/// the amount of text.
fn text_measure_function(
    known_dimensions: taffy::Size<Option<f32>>,
    available_space: taffy::Size<AvailableSpace>,
    _node_id: NodeId,
    node_context: Option<&mut TextMeasureContext>,
    _style: &Style,
) -> taffy::Size<f32> {
    if let (Some(width), Some(height)) = (known_dimensions.width, known_dimensions.height) {
        return taffy::Size { width, height };
    }

    let Some(ctx) = node_context else {
        return taffy::Size::ZERO;
    };

    let glyph = ctx.font_size * GLYPH_WIDTH;
    let natural_width = ctx.chars as f32 * glyph;
    let max_width = known_dimensions.width.or(match available_space.width {
        AvailableSpace::Definite(w) => Some(w),
        AvailableSpace::MaxContent => None,
        AvailableSpace::MinContent => Some(ctx.longest_word as f32 * glyph),
    });

    let width = match max_width {
        Some(max) => natural_width.min(max.max(glyph)),
        None => natural_width,
    };
    let lines = if width > 0.0 {
        (natural_width / width).ceil().max(1.0)
    } else {
        1.0
    };

    taffy::Size {
        width: known_dimensions.width.unwrap_or(width),
        height: known_dimensions
            .height
            .unwrap_or(lines * ctx.font_size * ctx.line_height),
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Declarative description of an element and its subtree
///
/// Containers default to a vertical flex column.
#[derive(Clone, Debug)]
pub struct NodeBuilder {
    role: Role,
    label: Option<String>,
    text: Option<String>,
    counter: Option<String>,
    font_size: f32,
    style: Style,
    children: Vec<NodeBuilder>,
}

/// Start describing an element with the given role
pub fn node(role: Role) -> NodeBuilder {
    NodeBuilder {
        role,
        label: None,
        text: None,
        counter: None,
        font_size: 16.0,
        style: Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            ..Style::default()
        },
        children: Vec::new(),
    }
}

impl NodeBuilder {
    /// Name used in logs and diagnostics
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Text content, measured during layout
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Terminal counter text such as `"150+"`
    ///
    /// Also used as the element's text. Texts without a number are kept as
    /// plain text and never counted.
    pub fn counter(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.counter = Some(text.clone());
        self.text = Some(text);
        self
    }

    pub fn font_size(mut self, px: f32) -> Self {
        self.font_size = px;
        self
    }

    pub fn w(mut self, px: f32) -> Self {
        self.style.size.width = Dimension::Length(px);
        self
    }

    pub fn h(mut self, px: f32) -> Self {
        self.style.size.height = Dimension::Length(px);
        self
    }

    pub fn w_full(mut self) -> Self {
        self.style.size.width = Dimension::Percent(1.0);
        self
    }

    pub fn min_h(mut self, px: f32) -> Self {
        self.style.min_size.height = Dimension::Length(px);
        self
    }

    /// Lay children out horizontally
    pub fn row(mut self) -> Self {
        self.style.flex_direction = FlexDirection::Row;
        self
    }

    pub fn column(mut self) -> Self {
        self.style.flex_direction = FlexDirection::Column;
        self
    }

    pub fn wrap(mut self) -> Self {
        self.style.flex_wrap = FlexWrap::Wrap;
        self
    }

    pub fn items_center(mut self) -> Self {
        self.style.align_items = Some(AlignItems::Center);
        self
    }

    pub fn gap(mut self, px: f32) -> Self {
        self.style.gap = taffy::Size {
            width: LengthPercentage::Length(px),
            height: LengthPercentage::Length(px),
        };
        self
    }

    pub fn padding(mut self, px: f32) -> Self {
        self.style.padding = taffy::Rect {
            left: LengthPercentage::Length(px),
            right: LengthPercentage::Length(px),
            top: LengthPercentage::Length(px),
            bottom: LengthPercentage::Length(px),
        };
        self
    }

    pub fn padding_xy(mut self, x: f32, y: f32) -> Self {
        self.style.padding = taffy::Rect {
            left: LengthPercentage::Length(x),
            right: LengthPercentage::Length(x),
            top: LengthPercentage::Length(y),
            bottom: LengthPercentage::Length(y),
        };
        self
    }

    pub fn flex_grow(mut self) -> Self {
        self.style.flex_grow = 1.0;
        self
    }

    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeBuilder>) -> Self {
        self.children.extend(children);
        self
    }
}

// ============================================================================
// Elements
// ============================================================================

/// A realized element
#[derive(Clone, Debug)]
pub struct Element {
    role: Role,
    label: String,
    text: Option<String>,
    counter: Option<CounterText>,
    bounds: Rect,
    visual: VisualState,
    ambient: VisualState,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    node: NodeId,
}

impl Element {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Parsed counter text, if the element shows a countable figure
    pub fn counter(&self) -> Option<&CounterText> {
        self.counter.as_ref()
    }

    /// Absolute bounds in document space
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// State written by triggered rules
    pub fn visual(&self) -> VisualState {
        self.visual
    }

    /// Layer written by ambient rules
    pub fn ambient(&self) -> VisualState {
        self.ambient
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// Role-tagged element tree with computed layout
pub struct PageTree {
    taffy: TaffyTree<TextMeasureContext>,
    elements: SlotMap<ElementId, Element>,
    /// Elements in document (pre-)order
    order: Vec<ElementId>,
    root: ElementId,
    width: f32,
    document_height: f32,
}

impl PageTree {
    /// Realize `root` and lay it out for a viewport `width` pixels wide
    pub fn build(root: NodeBuilder, width: f32) -> Result<Self, TaffyError> {
        let mut taffy = TaffyTree::new();
        let mut elements = SlotMap::with_key();
        let mut order = Vec::new();
        let root = insert(&mut taffy, &mut elements, &mut order, root, None)?;

        let mut tree = Self {
            taffy,
            elements,
            order,
            root,
            width,
            document_height: 0.0,
        };
        tree.relayout(width)?;
        Ok(tree)
    }

    /// Recompute layout for a new viewport width
    pub fn relayout(&mut self, width: f32) -> Result<(), TaffyError> {
        self.width = width;
        let root_node = self.elements[self.root].node;
        self.taffy.compute_layout_with_measure(
            root_node,
            taffy::Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::MaxContent,
            },
            text_measure_function,
        )?;

        // Pre-order guarantees parents are placed before their children
        for &id in &self.order {
            let element = &self.elements[id];
            let origin = element
                .parent
                .map(|p| self.elements[p].bounds.origin)
                .unwrap_or_default();
            let layout = self.taffy.layout(element.node)?;
            let bounds = Rect::new(
                origin.x + layout.location.x,
                origin.y + layout.location.y,
                layout.size.width,
                layout.size.height,
            );
            self.elements[id].bounds = bounds;
        }

        self.document_height = self.elements[self.root].bounds.bottom();
        Ok(())
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Total height of the laid-out document
    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Elements in document order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.order.iter().map(move |&id| (id, &self.elements[id]))
    }

    /// All elements with `role`, in document order
    pub fn query_role(&self, role: Role) -> Vec<ElementId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| self.elements[id].role == role)
            .collect()
    }

    /// First element with `role` in document order
    pub fn first(&self, role: Role) -> Option<ElementId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.elements[id].role == role)
    }

    /// Find an element by its label
    pub fn find_label(&self, label: &str) -> Option<ElementId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.elements[id].label == label)
    }

    /// Mutable access to the triggered visual state
    pub fn visual_mut(&mut self, id: ElementId) -> Option<&mut VisualState> {
        self.elements.get_mut(id).map(|e| &mut e.visual)
    }

    pub fn set_visual(&mut self, id: ElementId, visual: VisualState) {
        if let Some(element) = self.elements.get_mut(id) {
            element.visual = visual;
        }
    }

    pub fn set_ambient(&mut self, id: ElementId, ambient: VisualState) {
        if let Some(element) = self.elements.get_mut(id) {
            element.ambient = ambient;
        }
    }

    /// Triggered state with the ambient layer composed on top
    pub fn composed_visual(&self, id: ElementId) -> Option<VisualState> {
        self.elements
            .get(id)
            .map(|e| e.visual.compose(&e.ambient))
    }

    /// Text as currently displayed
    ///
    /// Counter elements show their figure at the current count progress.
    pub fn displayed_text(&self, id: ElementId) -> Option<String> {
        let element = self.elements.get(id)?;
        match &element.counter {
            Some(counter) => Some(counter.display(element.visual.count)),
            None => element.text.clone(),
        }
    }

    /// Every element whose layout box contains the document point, in
    /// document order (ancestors before descendants)
    pub fn hit_test_all(&self, x: f32, y: f32) -> Vec<ElementId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| self.elements[id].bounds.contains_xy(x, y))
            .collect()
    }

    /// The frontmost element at a document point
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ElementId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&id| self.elements[id].bounds.contains_xy(x, y))
    }

    /// Reset every visual record to rest
    pub fn reset_visuals(&mut self) {
        for (_, element) in self.elements.iter_mut() {
            element.visual = VisualState::IDENTITY;
            element.ambient = VisualState::IDENTITY;
        }
    }
}

fn insert(
    taffy: &mut TaffyTree<TextMeasureContext>,
    elements: &mut SlotMap<ElementId, Element>,
    order: &mut Vec<ElementId>,
    builder: NodeBuilder,
    parent: Option<ElementId>,
) -> Result<ElementId, TaffyError> {
    let NodeBuilder {
        role,
        label,
        text,
        counter,
        font_size,
        style,
        children,
    } = builder;

    let taffy_node = match &text {
        Some(content) if children.is_empty() => {
            taffy.new_leaf_with_context(style, TextMeasureContext::new(content, font_size))?
        }
        _ => taffy.new_leaf(style)?,
    };

    if let Some(parent) = parent {
        let parent_node = elements[parent].node;
        taffy.add_child(parent_node, taffy_node)?;
    }

    let id = elements.insert(Element {
        role,
        label: label.unwrap_or_else(|| role.to_string()),
        counter: counter.as_deref().and_then(CounterText::parse),
        text,
        bounds: Rect::ZERO,
        visual: VisualState::IDENTITY,
        ambient: VisualState::IDENTITY,
        parent,
        children: Vec::new(),
        node: taffy_node,
    });
    order.push(id);
    if let Some(parent) = parent {
        elements[parent].children.push(id);
    }

    for child in children {
        insert(taffy, elements, order, child, Some(id))?;
    }

    Ok(id)
}
