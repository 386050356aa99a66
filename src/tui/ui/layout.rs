//! Screen areas that come and go with application state.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Title,
    FindBar,
    Body,
    Outline,
    Content,
    Status,
}

/// Maps section ids to their areas; hidden sections have none.
#[derive(Debug)]
pub struct DynamicLayout {
    areas: HashMap<Section, Rect>,
}

impl DynamicLayout {
    pub fn vertical(area: Rect) -> DynamicLayoutBuilder {
        DynamicLayoutBuilder::new(area, Direction::Vertical)
    }

    pub fn horizontal(area: Rect) -> DynamicLayoutBuilder {
        DynamicLayoutBuilder::new(area, Direction::Horizontal)
    }

    pub fn get(&self, id: Section) -> Option<Rect> {
        self.areas.get(&id).copied()
    }

    /// Area of a section that is always laid out. Empty if it was not.
    pub fn area(&self, id: Section) -> Rect {
        self.get(id).unwrap_or_default()
    }
}

pub struct DynamicLayoutBuilder {
    area: Rect,
    direction: Direction,
    sections: Vec<(Section, Constraint)>,
}

impl DynamicLayoutBuilder {
    fn new(area: Rect, direction: Direction) -> Self {
        Self {
            area,
            direction,
            sections: Vec::new(),
        }
    }

    pub fn section(self, id: Section, constraint: Constraint) -> Self {
        self.section_if(true, id, constraint)
    }

    pub fn section_if(mut self, visible: bool, id: Section, constraint: Constraint) -> Self {
        if visible {
            self.sections.push((id, constraint));
        }
        self
    }

    pub fn build(self) -> DynamicLayout {
        let chunks = Layout::default()
            .direction(self.direction)
            .constraints(self.sections.iter().map(|&(_, c)| c))
            .split(self.area);

        let areas = self
            .sections
            .iter()
            .map(|&(id, _)| id)
            .zip(chunks.iter().copied())
            .collect();
        DynamicLayout { areas }
    }
}
