//! Assembled page and its input runtime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use common::{SiteError, SiteResult};
use components::{
    create_section, init_footer, init_header, set_up_head, FooterOptions, HeadOptions, Header,
    RenderContext,
};
use dom::{serialize_document, Document, Event, EventType, NodeId, SerializeOptions};
use media::{MediaResolver, VideoPlaybackState};
use tracing::{debug, info, warn};
use url::Url;
use web_apis::{DOMRect, TimerQueue};

use crate::config::SiteConfig;
use crate::pages::{PageData, PageTable};

/// A rendered page with live video controllers.
pub struct Page {
    id: String,
    ctx: RenderContext,
    timers: Arc<TimerQueue>,
    header: Option<Header>,
    main: NodeId,
}

impl Page {
    /// Build the page `id`: head, header, main content and footer.
    pub fn assemble(config: &SiteConfig, table: &PageTable, id: &str) -> SiteResult<Self> {
        let data = table
            .get(id)
            .ok_or_else(|| SiteError::not_found(format!("page '{id}'")))?;

        let url = Url::parse(&config.base_url)
            .and_then(|base| base.join(&data.href))
            .map_err(|e| SiteError::config(format!("invalid base url '{}': {e}", config.base_url)))?;

        let timers = Arc::new(TimerQueue::new());
        let resolver = MediaResolver::new(&config.navigator(), timers.clone(), config.video.clone())
            .with_autoplay_policy(config.autoplay_policy);
        let mut ctx = RenderContext::new(Document::new(url), resolver);

        let analytics_id = if data.include_analytics {
            config.analytics_id.clone()
        } else {
            None
        };
        set_up_head(
            &mut ctx.doc,
            &HeadOptions {
                title: data.page_title.clone(),
                description: data.description.clone(),
                analytics_id,
            },
        );

        let header = init_header(&mut ctx.doc, &config.site_name, &table.nav_items());
        let main = build_main(&mut ctx, data);
        ctx.doc.append_to_body(main);

        init_footer(
            &mut ctx.doc,
            &FooterOptions {
                year: config.copyright_year,
                site_name: config.site_name.clone(),
                location: config.location.clone(),
            },
        );
        ctx.doc.finish_loading();

        info!(
            page = id,
            videos = ctx.media.video_count(),
            mode = ?ctx.media.mode(),
            "page assembled"
        );

        Ok(Self {
            id: id.to_string(),
            ctx,
            timers,
            header,
            main,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.ctx.doc.title
    }

    pub fn document(&self) -> &Document {
        &self.ctx.doc
    }

    pub fn main(&self) -> NodeId {
        self.main
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn cards(&self) -> Vec<NodeId> {
        self.ctx.doc.get_elements_by_class_name("card")
    }

    pub fn videos(&self) -> Vec<NodeId> {
        self.ctx.doc.get_elements_by_tag_name("video")
    }

    /// Dispatch a fresh event of `event_type` at `node`.
    ///
    /// Returns `false` when a listener prevented the default action.
    pub fn dispatch(&mut self, node: NodeId, event_type: EventType) -> bool {
        let mut event = Event::new(event_type);
        self.dispatch_event(node, &mut event)
    }

    pub fn dispatch_event(&mut self, node: NodeId, event: &mut Event) -> bool {
        let allowed = self.ctx.doc.dispatch_event(node, event);
        if let Some(header) = &self.header {
            header.mobile_nav.sync(&mut self.ctx.doc);
        }
        debug!(event = event.event_type.as_str(), allowed, "event dispatched");
        allowed
    }

    /// Advance the page clock, firing due timers. Returns the number fired.
    pub fn advance(&mut self, by: Duration) -> usize {
        self.timers.advance(by)
    }

    /// Report a video's visibility as the intersection observer would.
    pub fn set_visible(&mut self, video: NodeId, visible: bool) -> usize {
        self.ctx.notify_visibility(video, visible)
    }

    /// Recompute visibility from layout boxes.
    pub fn update_layout(&mut self, viewport: &DOMRect, boxes: &HashMap<NodeId, DOMRect>) -> usize {
        self.ctx.observers.process(viewport, boxes)
    }

    /// Play `video` to its end and fire its `ended` event.
    pub fn media_ended(&mut self, video: NodeId) {
        if let Some(element) = self.ctx.media.element(video) {
            element.finish();
        }
        self.dispatch(video, EventType::Ended);
    }

    pub fn playback(&self, video: NodeId) -> Option<VideoPlaybackState> {
        self.ctx.media.playback(video)
    }

    pub fn is_playing(&self, video: NodeId) -> bool {
        self.ctx.media.element(video).map(|e| !e.paused()).unwrap_or(false)
    }

    /// Remove a subtree, releasing video controllers inside it.
    pub fn remove(&mut self, node: NodeId) -> usize {
        self.ctx.remove_node(node).len()
    }

    /// Serialize the document, for `--dump-dom`.
    pub fn render_html(&self) -> String {
        serialize_document(&self.ctx.doc, &SerializeOptions::new().pretty())
    }
}

fn build_main(ctx: &mut RenderContext, data: &PageData) -> NodeId {
    let main = ctx.doc.create_element("main");
    ctx.doc.set_attribute(main, "id", "main-content");

    let heading = ctx.doc.create_element("h1");
    ctx.doc.set_text_content(heading, &data.heading);
    ctx.doc.append_child(main, heading);

    if let Some(description) = data.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let paragraph = ctx.doc.create_element("p");
        ctx.doc.set_text_content(paragraph, description);
        ctx.doc.append_child(main, paragraph);
    }

    for (index, section) in data.sections.iter().enumerate() {
        match create_section(ctx, section) {
            Ok(node) => ctx.doc.append_child(main, node),
            Err(err) => warn!(page = %data.id, index, error = %err, "skipping section"),
        }
    }

    main
}
