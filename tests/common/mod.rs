//! In-memory catalog DOM for the harvest test suite
//!
//! `FakeDocument` implements the crate's `Document`/`Node` traits over a
//! small element arena. It understands the selector subset the pipeline uses
//! (tag, `#id`, `.class` compounds joined by descendant combinators), models
//! pagination through a listing container whose children swap per page, and
//! records clicks, fills and per-node queries for assertions.
//!
//! While the busy indicator is up after a page turn, the listing still shows
//! the previous page, so reading products too early returns stale entries.

#![allow(dead_code)]

use chrono::NaiveDate;
use coffee_harvest::{Document, HarvestError, HarvestResult, Node};
use std::sync::{Arc, Mutex, MutexGuard};

/// "Today" for every fixture in the suite
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

/// Roast label inside the two-month window of `today()`
pub const FRESH_LABEL: &str = "Data palenia: 15.03.2024";

/// Roast label outside the two-month window of `today()`
pub const STALE_LABEL: &str = "Data palenia: 01.01.2024";

/// Polls the busy indicator stays up after a state-changing click
const LOADER_POLLS_AFTER_CLICK: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Plain,
    /// Clicking turns the listing to the next page
    NextPage,
    /// Present only while the listing is reloading
    Loader,
    /// Every read fails like a detached element would
    Broken,
}

#[derive(Debug, Clone)]
pub struct El {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    attrs: Vec<(String, String)>,
    visible: bool,
    behavior: Behavior,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            text: String::new(),
            attrs: Vec::new(),
            visible: true,
            behavior: Behavior::Plain,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }
}

struct NodeData {
    el: El,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Default, Clone)]
pub struct Log {
    pub visits: Vec<String>,
    pub styles: Vec<String>,
    pub clicks: Vec<usize>,
    pub fills: Vec<(usize, String)>,
    /// (node, selector) for every query made through a `Node`
    pub node_queries: Vec<(usize, String)>,
    /// Ordered trace: `query <selector>` for document queries,
    /// `next page` on page turns, `loader cleared` when the indicator goes
    pub events: Vec<String>,
}

pub struct DomState {
    nodes: Vec<NodeData>,
    listing: Option<usize>,
    pages: Vec<Vec<usize>>,
    current_page: usize,
    previous_page: usize,
    pages_shown: usize,
    loader_polls: usize,
    pub log: Log,
}

impl DomState {
    fn children(&self, id: usize) -> Vec<usize> {
        let children = if Some(id) == self.listing {
            let page = if self.loader_polls > 0 {
                self.previous_page
            } else {
                self.current_page
            };
            self.pages.get(page).cloned().unwrap_or_default()
        } else {
            self.nodes[id].children.clone()
        };
        children
            .into_iter()
            .filter(|c| self.nodes[*c].el.behavior != Behavior::Loader || self.loader_polls > 0)
            .collect()
    }

    fn descendants(&self, scope: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children(scope).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    fn parent(&self, id: usize) -> Option<usize> {
        self.nodes[id].parent
    }

    fn text_content(&self, id: usize) -> String {
        let mut text = self.nodes[id].el.text.clone();
        for child in self.children(id) {
            text.push_str(&self.text_content(child));
        }
        text
    }

    fn attribute(&self, id: usize, name: &str) -> Option<String> {
        let el = &self.nodes[id].el;
        if el.behavior == Behavior::NextPage
            && name == "disabled"
            && self.current_page + 1 >= self.pages.len()
        {
            return Some(String::new());
        }
        el.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn check(&self, id: usize) -> HarvestResult<()> {
        if self.nodes[id].el.behavior == Behavior::Broken {
            return Err(HarvestError::Browser("Node is detached from document".into()));
        }
        Ok(())
    }

    fn select(&mut self, scope: usize, selector: &str) -> Vec<usize> {
        let compounds: Vec<Compound> = selector.split_whitespace().map(Compound::parse).collect();
        let matches: Vec<usize> = self
            .descendants(scope)
            .into_iter()
            .filter(|id| self.matches_chain(*id, &compounds))
            .collect();

        if matches
            .iter()
            .any(|id| self.nodes[*id].el.behavior == Behavior::Loader)
        {
            self.loader_polls = self.loader_polls.saturating_sub(1);
            if self.loader_polls == 0 {
                self.log.events.push("loader cleared".to_string());
            }
        }
        matches
    }

    fn matches_chain(&self, id: usize, compounds: &[Compound]) -> bool {
        let Some((last, rest)) = compounds.split_last() else {
            return false;
        };
        if !last.matches(&self.nodes[id].el) {
            return false;
        }
        let mut remaining = rest;
        let mut cursor = self.parent(id);
        while let Some((want, before)) = remaining.split_last() {
            loop {
                let Some(ancestor) = cursor else {
                    return false;
                };
                cursor = self.parent(ancestor);
                if want.matches(&self.nodes[ancestor].el) {
                    break;
                }
            }
            remaining = before;
        }
        true
    }

    fn select_text(&self, scope: usize, needle: &str) -> Vec<usize> {
        let needle = needle.to_lowercase();
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.nodes[*id].el.text.to_lowercase().contains(&needle))
            .collect()
    }

    fn click(&mut self, id: usize) -> HarvestResult<()> {
        self.check(id)?;
        self.log.clicks.push(id);
        if self.nodes[id].el.behavior == Behavior::NextPage {
            if self.current_page + 1 >= self.pages.len() {
                return Err(HarvestError::Browser("next page control is disabled".into()));
            }
            self.previous_page = self.current_page;
            self.current_page += 1;
            self.log.events.push("next page".to_string());
            self.pages_shown = self.pages_shown.max(self.current_page + 1);
        }
        self.loader_polls = LOADER_POLLS_AFTER_CLICK;
        Ok(())
    }
}

struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(part: &str) -> Self {
        let mut tag = None;
        let mut id = None;
        let mut classes = Vec::new();

        let mut token = String::new();
        let mut kind = ' ';
        for ch in part.chars().chain(std::iter::once('\0')) {
            if ch == '.' || ch == '#' || ch == '\0' {
                match kind {
                    '.' => classes.push(std::mem::take(&mut token)),
                    '#' => id = Some(std::mem::take(&mut token)),
                    _ if !token.is_empty() => tag = Some(std::mem::take(&mut token)),
                    _ => {}
                }
                kind = ch;
            } else {
                token.push(ch);
            }
        }
        Self { tag, id, classes }
    }

    fn matches(&self, el: &El) -> bool {
        self.tag.as_ref().is_none_or(|t| *t == el.tag)
            && self.id.as_ref().is_none_or(|i| el.id.as_ref() == Some(i))
            && self.classes.iter().all(|c| el.classes.contains(c))
    }
}

/// Shared handle to the arena; nodes and the document all point at it
#[derive(Clone)]
pub struct FakeDom {
    state: Arc<Mutex<DomState>>,
}

impl FakeDom {
    pub fn new() -> Self {
        let root = NodeData {
            el: El::new("body"),
            parent: None,
            children: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(DomState {
                nodes: vec![root],
                listing: None,
                pages: Vec::new(),
                current_page: 0,
                previous_page: 0,
                pages_shown: 0,
                loader_polls: 0,
                log: Log::default(),
            })),
        }
    }

    pub fn root(&self) -> usize {
        0
    }

    fn lock(&self) -> MutexGuard<'_, DomState> {
        self.state.lock().unwrap()
    }

    pub fn append(&self, parent: usize, el: El) -> usize {
        let mut state = self.lock();
        let id = state.nodes.len();
        state.nodes.push(NodeData {
            el,
            parent: Some(parent),
            children: Vec::new(),
        });
        state.nodes[parent].children.push(id);
        id
    }

    /// Make `container` the listing whose children come from `add_listing_page`
    pub fn set_listing(&self, container: usize) {
        let mut state = self.lock();
        state.listing = Some(container);
        state.pages_shown = 1;
    }

    /// Add one listing page; returns the product node ids in order
    pub fn add_listing_page(&self, products: &[ProductSpec]) -> Vec<usize> {
        let listing = self.lock().listing.expect("listing container not set");
        let ids: Vec<usize> = products
            .iter()
            .map(|spec| self.detached_product(listing, spec))
            .collect();
        self.lock().pages.push(ids.clone());
        ids
    }

    /// Build a product subtree whose parent is `listing` but which is not
    /// one of its static children
    fn detached_product(&self, listing: usize, spec: &ProductSpec) -> usize {
        let id = self.append(listing, El::new("div").class("product-box"));
        self.lock().nodes[listing].children.retain(|c| *c != id);

        let info = self.append(id, El::new("div").class("product-info"));
        let mut link = El::new("a").text(&spec.name);
        if let Some(href) = &spec.href {
            link = link.attr("href", href);
        }
        self.append(info, link);

        if let Some(label) = &spec.roast {
            let mut el = El::new("span").class("product-box__roasting-data").text(label);
            if !spec.roast_visible {
                el = el.hidden();
            }
            if spec.roast_broken {
                el = el.behavior(Behavior::Broken);
            }
            self.append(id, el);
        }

        if !spec.available {
            self.append(
                id,
                El::new("div")
                    .class("product-detail-not-available")
                    .text("Produkt niedostępny"),
            );
        }
        id
    }

    pub fn document(&self) -> FakeDocument {
        FakeDocument { dom: self.clone() }
    }

    pub fn node(&self, id: usize) -> FakeNode {
        FakeNode {
            dom: self.clone(),
            id,
        }
    }

    pub fn log(&self) -> Log {
        self.lock().log.clone()
    }

    pub fn own_text(&self, id: usize) -> String {
        self.lock().nodes[id].el.text.clone()
    }

    /// Own texts of every clicked node, in click order
    pub fn clicked_texts(&self) -> Vec<String> {
        let state = self.lock();
        state
            .log
            .clicks
            .iter()
            .map(|id| state.nodes[*id].el.text.clone())
            .collect()
    }

    /// Number of distinct listing pages that were displayed
    pub fn pages_shown(&self) -> usize {
        self.lock().pages_shown
    }

    /// Event trace restricted to entries accepted by `keep`
    pub fn events_where(&self, keep: impl Fn(&str) -> bool) -> Vec<String> {
        self.lock()
            .log
            .events
            .iter()
            .filter(|e| keep(e.as_str()))
            .cloned()
            .collect()
    }

    /// Selectors queried on `node` through the `Node` trait
    pub fn queries_on(&self, node: usize) -> Vec<String> {
        self.lock()
            .log
            .node_queries
            .iter()
            .filter(|(id, _)| *id == node)
            .map(|(_, s)| s.clone())
            .collect()
    }
}

#[derive(Clone)]
pub struct FakeDocument {
    dom: FakeDom,
}

impl FakeDocument {
    pub fn dom(&self) -> &FakeDom {
        &self.dom
    }
}

impl Document for FakeDocument {
    type Node = FakeNode;

    async fn goto(&self, url: &str) -> HarvestResult<()> {
        self.dom.lock().log.visits.push(url.to_string());
        Ok(())
    }

    async fn add_style(&self, css: &str) -> HarvestResult<()> {
        self.dom.lock().log.styles.push(css.to_string());
        Ok(())
    }

    async fn query(&self, selector: &str) -> HarvestResult<Option<FakeNode>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> HarvestResult<Vec<FakeNode>> {
        let ids = {
            let mut state = self.dom.lock();
            state.log.events.push(format!("query {selector}"));
            state.select(0, selector)
        };
        Ok(ids.into_iter().map(|id| self.dom.node(id)).collect())
    }

    async fn query_text(&self, text: &str) -> HarvestResult<Vec<FakeNode>> {
        let ids = self.dom.lock().select_text(0, text);
        Ok(ids.into_iter().map(|id| self.dom.node(id)).collect())
    }
}

#[derive(Clone)]
pub struct FakeNode {
    dom: FakeDom,
    pub id: usize,
}

impl Node for FakeNode {
    async fn click(&self) -> HarvestResult<()> {
        self.dom.lock().click(self.id)
    }

    async fn fill(&self, value: &str) -> HarvestResult<()> {
        let mut state = self.dom.lock();
        state.check(self.id)?;
        state.log.fills.push((self.id, value.to_string()));
        Ok(())
    }

    async fn text_content(&self) -> HarvestResult<Option<String>> {
        let state = self.dom.lock();
        state.check(self.id)?;
        Ok(Some(state.text_content(self.id)))
    }

    async fn attribute(&self, name: &str) -> HarvestResult<Option<String>> {
        let state = self.dom.lock();
        state.check(self.id)?;
        Ok(state.attribute(self.id, name))
    }

    async fn is_visible(&self) -> HarvestResult<bool> {
        let state = self.dom.lock();
        state.check(self.id)?;
        Ok(state.nodes[self.id].el.visible)
    }

    async fn query(&self, selector: &str) -> HarvestResult<Option<Self>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> HarvestResult<Vec<Self>> {
        let ids = {
            let mut state = self.dom.lock();
            state.log.node_queries.push((self.id, selector.to_string()));
            state.select(self.id, selector)
        };
        Ok(ids.into_iter().map(|id| self.dom.node(id)).collect())
    }

    async fn query_text(&self, text: &str) -> HarvestResult<Vec<Self>> {
        let ids = self.dom.lock().select_text(self.id, text);
        Ok(ids.into_iter().map(|id| self.dom.node(id)).collect())
    }
}

/// One product entry of a listing page
#[derive(Debug, Clone)]
pub struct ProductSpec {
    pub name: String,
    pub href: Option<String>,
    pub available: bool,
    pub roast: Option<String>,
    pub roast_visible: bool,
    pub roast_broken: bool,
}

impl ProductSpec {
    /// Available, roasted inside the window
    pub fn fresh(slug: &str) -> Self {
        Self {
            name: slug.to_string(),
            href: Some(format!("/kawa/{slug}")),
            available: true,
            roast: Some(FRESH_LABEL.to_string()),
            roast_visible: true,
            roast_broken: false,
        }
    }

    /// Available, roasted before the window
    pub fn stale(slug: &str) -> Self {
        Self {
            roast: Some(STALE_LABEL.to_string()),
            ..Self::fresh(slug)
        }
    }

    /// Carries the "not available" marker; roast date is fresh
    pub fn unavailable(slug: &str) -> Self {
        Self {
            available: false,
            ..Self::fresh(slug)
        }
    }

    pub fn roast(mut self, label: Option<&str>) -> Self {
        self.roast = label.map(str::to_string);
        self
    }

    pub fn roast_hidden(mut self) -> Self {
        self.roast_visible = false;
        self
    }

    pub fn roast_broken(mut self) -> Self {
        self.roast_broken = true;
        self
    }

    pub fn no_href(mut self) -> Self {
        self.href = None;
        self
    }

    pub fn href(&self) -> String {
        self.href.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Enabled,
    /// Checkbox carries `disabled`
    Disabled,
    /// Entry is in the list but not rendered
    Hidden,
}

/// Producer options rendered in the producer dropdown
pub const PRODUCER_OPTIONS: &[(&str, OptionState)] = &[
    ("3FE", OptionState::Enabled),
    ("LAVAZZA", OptionState::Enabled),
    ("KAFAR", OptionState::Disabled),
    ("HARD BEANS", OptionState::Hidden),
    ("HAYB", OptionState::Enabled),
    ("DOUBLESHOT", OptionState::Enabled),
];

/// Flavour options rendered in the flavour dropdown
pub const FLAVOUR_OPTIONS: &[(&str, OptionState)] = &[
    ("owoce czerwone", OptionState::Enabled),
    ("czekolada", OptionState::Enabled),
    ("słodkie", OptionState::Disabled),
    ("przyprawy", OptionState::Enabled),
];

/// Full catalog page: consent dialog, filters, listing, pagination, loader
pub struct CatalogFixture {
    pages: Vec<Vec<ProductSpec>>,
    rating_control_first: bool,
    price_control: bool,
    cookie_button: bool,
    next_control: bool,
}

impl CatalogFixture {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            rating_control_first: false,
            price_control: true,
            cookie_button: true,
            next_control: true,
        }
    }

    pub fn page(mut self, products: Vec<ProductSpec>) -> Self {
        self.pages.push(products);
        self
    }

    /// Put "Ocena min." before "Cena" in the more-filters panel
    pub fn rating_control_first(mut self) -> Self {
        self.rating_control_first = true;
        self
    }

    pub fn without_price_controls(mut self) -> Self {
        self.price_control = false;
        self
    }

    pub fn without_cookie_button(mut self) -> Self {
        self.cookie_button = false;
        self
    }

    pub fn without_next_control(mut self) -> Self {
        self.next_control = false;
        self
    }

    pub fn build(self) -> FakeDom {
        let dom = FakeDom::new();
        let root = dom.root();

        if self.cookie_button {
            dom.append(
                root,
                El::new("button")
                    .id("CybotCookiebotDialogBodyLevelButtonLevelOptinAllowAll")
                    .text("Zezwól na wszystkie"),
            );
        }

        let panel = dom.append(root, El::new("div").class("filter-panel-items-container"));

        let producers = dom.append(
            panel,
            El::new("div")
                .class("filter-multi-select filter-multi-select-manufacturer")
                .text("Producent"),
        );
        add_options(&dom, producers, PRODUCER_OPTIONS);

        let sorting = dom.append(
            panel,
            El::new("div")
                .class("filter-multi-select filter-multi-select-sorting")
                .text("Sortowanie"),
        );
        let sort_list = dom.append(sorting, El::new("ul"));
        for option in ["Cena (malejąco)", "Cena (rosnąco)", "Nazwa"] {
            dom.append(sort_list, El::new("li").text(option));
        }

        let flavours = dom.append(
            panel,
            El::new("div").class("filter-multi-select").text("Nuty smakowe"),
        );
        add_options(&dom, flavours, FLAVOUR_OPTIONS);

        dom.append(panel, El::new("button").class("btn").text("Więcej filtrów"));

        let more = dom.append(root, El::new("div").class("more-filters-container"));
        if self.price_control {
            let price = El::new("div").class("filter-range").text("Cena");
            let rating = El::new("div").class("filter-range").text("Ocena min.");
            if self.rating_control_first {
                dom.append(more, rating);
                dom.append(more, price);
            } else {
                dom.append(more, price);
                dom.append(more, rating);
            }
        }
        dom.append(more, El::new("input").class("form-control min-input"));
        dom.append(more, El::new("input").class("form-control max-input"));

        let listing = dom.append(root, El::new("div").class("product-listing"));
        dom.set_listing(listing);
        for page in &self.pages {
            dom.add_listing_page(page);
        }

        if self.next_control {
            dom.append(
                root,
                El::new("a")
                    .class("page-link page-next")
                    .text("Następna")
                    .behavior(Behavior::NextPage),
            );
        }

        dom.append(
            root,
            El::new("div")
                .class("has-element-loader")
                .behavior(Behavior::Loader),
        );

        dom
    }
}

fn add_options(dom: &FakeDom, dropdown: usize, options: &[(&str, OptionState)]) {
    let list = dom.append(dropdown, El::new("ul"));
    for (name, state) in options {
        let mut entry = El::new("li");
        if *state == OptionState::Hidden {
            entry = entry.hidden();
        }
        let li = dom.append(list, entry);
        let mut input = El::new("input").attr("type", "checkbox");
        if *state == OptionState::Disabled {
            input = input.attr("disabled", "");
        }
        dom.append(li, input);
        dom.append(li, El::new("label").text(name));
    }
}

/// `n` products built by `make`, slugs `{prefix}-{i}`
pub fn products(prefix: &str, n: usize, make: fn(&str) -> ProductSpec) -> Vec<ProductSpec> {
    (1..=n).map(|i| make(&format!("{prefix}-{i}"))).collect()
}
