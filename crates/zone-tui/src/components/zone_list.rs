//! ZoneList component — the featured strip and the main zone list.
//!
//! Both panes render the same card rows; they differ only in which half of
//! the controller's selection they show.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use zone_proto::controller::Status;
use zone_proto::query::Selection;
use zone_proto::render::{Thumbnail, ZoneCard};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::Palette,
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

const DOUBLE_CLICK_MS: u128 = 400;

pub struct ZoneList {
    id: ComponentId,
    title: &'static str,
    number_key: char,
    pub list: ScrollableList,
    list_state: ListState,
    last_click: Option<(usize, Instant)>,
}

impl ZoneList {
    pub fn featured() -> Self {
        Self::new(ComponentId::Featured, "featured", '1')
    }

    pub fn zones() -> Self {
        Self::new(ComponentId::Zones, "zones", '2')
    }

    fn new(id: ComponentId, title: &'static str, number_key: char) -> Self {
        Self {
            id,
            title,
            number_key,
            list: ScrollableList::new(),
            list_state: ListState::default(),
            last_click: None,
        }
    }

    fn entries_from(&self, selection: &Selection) -> Vec<usize> {
        match self.id {
            ComponentId::Featured => selection.featured.clone(),
            _ => selection.main.clone(),
        }
    }

    /// Pull the current entries from the controller's selection.
    pub fn sync(&mut self, state: &AppState) {
        let entries = self.entries_from(state.controller.selection());
        self.list.set_entries(entries);
    }

    fn open_selected(&self) -> Vec<Action> {
        self.list
            .selected_entry()
            .map(|idx| vec![Action::OpenZone(idx)])
            .unwrap_or_default()
    }

    fn empty_message(&self, state: &AppState) -> &'static str {
        match state.controller.status() {
            Status::Locked => "  locked",
            Status::Loading => "  loading zones…",
            Status::Error(_) if state.controller.zone_count() == 0 => "  no zones loaded",
            _ if self.id == ComponentId::Featured => "  nothing matches",
            _ if state.controller.selection().is_empty() => "  no zones match",
            _ => "  every match is featured above",
        }
    }
}

fn card_line(
    card: &ZoneCard,
    author: &str,
    tags: &[String],
    selected: bool,
    p: &Palette,
) -> Line<'static> {
    let (glyph, glyph_color) = match card.thumbnail {
        Thumbnail::Image(_) => ("▣", p.tag),
        Thumbnail::Placeholder => ("□", p.muted),
    };
    let title_style = if selected {
        Style::default().fg(p.primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(p.secondary)
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", glyph), Style::default().fg(glyph_color)),
        Span::styled(card.title.clone(), title_style),
        Span::styled("  ", Style::default()),
        Span::styled(author.to_string(), Style::default().fg(p.author)),
    ];
    if let Some(ref plays) = card.plays {
        spans.push(Span::styled(" · ", Style::default().fg(p.muted)));
        spans.push(Span::styled(plays.clone(), Style::default().fg(p.plays)));
    }
    if selected && !tags.is_empty() {
        spans.push(Span::styled("  ", Style::default()));
        spans.push(Span::styled(tags.join(" · "), Style::default().fg(p.tag)));
    }
    Line::from(spans)
}

impl Component for ZoneList {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => return self.open_selected(),
            KeyCode::Char('y') => {
                if let Some(zone) = self
                    .list
                    .selected_entry()
                    .and_then(|idx| state.controller.zone(idx))
                {
                    return vec![Action::CopyToClipboard(zone.url.clone())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize; // +1 for the border
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .map(|(row, t)| row == rel_row && t.elapsed().as_millis() < DOUBLE_CLICK_MS)
                    .unwrap_or(false);
                if self.list.handle_click(rel_row) && is_double {
                    self.last_click = None;
                    return self.open_selected();
                }
                self.last_click = Some((rel_row, now));
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::CatalogChanged = action {
            self.sync(state);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let p = &state.palette;
        let count = self.list.len().to_string();
        let badge = (!self.list.is_empty()).then(|| Badge {
            text: &count,
            color: p.secondary,
        });
        let block = pane_chrome(self.title, Some(self.number_key), focused, badge, p);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(self.empty_message(state), p.style_muted())),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let sel_in_view = self.list.selected_in_view();

        let items: Vec<ListItem> = self
            .list
            .visible(height)
            .iter()
            .enumerate()
            .filter_map(|(row, &idx)| {
                let zone = state.controller.zone(idx)?;
                let card = ZoneCard::from_zone(zone);
                let selected = row == sel_in_view;
                let line = card_line(&card, zone.author_label(), &zone.tags, selected, p);
                let item = ListItem::new(line);
                Some(if selected {
                    item.style(p.style_selected(focused))
                } else {
                    item
                })
            })
            .collect();

        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(List::new(items), inner, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zone_proto::protocol::Zone;

    #[test]
    fn card_line_shows_plays_only_when_present() {
        let p = Palette::dark();
        let mut zone = Zone {
            id: "1".into(),
            name: "Alpha".into(),
            ..Zone::default()
        };
        let text = |l: &Line| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>();

        let quiet = card_line(&ZoneCard::from_zone(&zone), zone.author_label(), &[], false, &p);
        assert_eq!(text(&quiet), " □ Alpha  Unknown");

        zone.popularity = 1500;
        zone.image = Some("https://img/1.png".into());
        let busy = card_line(&ZoneCard::from_zone(&zone), "ann", &["arcade".into()], true, &p);
        assert_eq!(text(&busy), " ▣ Alpha  ann · 1,500 plays  arcade");
    }
}
