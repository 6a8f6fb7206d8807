use crate::model::{Block, ListKind, TextBlock};

/// Content grouping for rendering and for writing a document back into an
/// editable surface.
///
/// Consecutive list-item blocks are gathered into list groups so they can be
/// emitted as `<ul>`/`<ol>`; everything else stays a single block.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentGroup<'a> {
    Single(&'a Block),
    BulletList { items: Vec<ListItem<'a>> },
    NumberedList { items: Vec<ListItem<'a>> },
}

/// A list item with the items nested one level deeper beneath it.
///
/// Nested items may be of a different list kind than their parent; callers
/// split `children` into runs with [`kind_runs`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem<'a> {
    pub block: &'a TextBlock,
    pub children: Vec<ListItem<'a>>,
}

impl ListItem<'_> {
    pub fn kind(&self) -> ListKind {
        self.block.list_item.unwrap_or(ListKind::Bullet)
    }
}

/// Groups a flat block sequence for rendering.
pub fn group_blocks(blocks: &[Block]) -> Vec<ContentGroup<'_>> {
    let mut groups = Vec::new();
    let mut i = 0;

    while i < blocks.len() {
        let Some(first) = list_item(&blocks[i]) else {
            groups.push(ContentGroup::Single(&blocks[i]));
            i += 1;
            continue;
        };

        // Deeper items always join the run; a sibling of another kind at the
        // base level starts a new list.
        let base = level_of(first);
        let kind = first.list_item.unwrap_or(ListKind::Bullet);
        let mut run = Vec::new();
        while let Some(tb) = blocks.get(i).and_then(list_item) {
            if level_of(tb) <= base && tb.list_item != Some(kind) {
                break;
            }
            run.push(tb);
            i += 1;
        }

        let items = build_nested_list_structure(&run, base);
        groups.push(match kind {
            ListKind::Number => ContentGroup::NumberedList { items },
            ListKind::Bullet => ContentGroup::BulletList { items },
        });
    }

    groups
}

/// Splits sibling items into maximal runs sharing one list kind.
pub fn kind_runs<'s, 'a>(items: &'s [ListItem<'a>]) -> Vec<(ListKind, &'s [ListItem<'a>])> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=items.len() {
        if i == items.len() || items[i].kind() != items[start].kind() {
            if start < i {
                runs.push((items[start].kind(), &items[start..i]));
            }
            start = i;
        }
    }
    runs
}

fn list_item(block: &Block) -> Option<&TextBlock> {
    block.as_text().filter(|tb| tb.is_list_item())
}

fn level_of(tb: &TextBlock) -> u8 {
    tb.level.unwrap_or(1).max(1)
}

fn build_nested_list_structure<'a>(run: &[&'a TextBlock], base: u8) -> Vec<ListItem<'a>> {
    let mut result = Vec::new();
    for &block in run {
        let item = ListItem {
            block,
            children: Vec::new(),
        };
        insert_list_item_at_depth(&mut result, item, level_of(block).saturating_sub(base));
    }
    result
}

fn insert_list_item_at_depth<'a>(items: &mut Vec<ListItem<'a>>, item: ListItem<'a>, depth: u8) {
    if depth == 0 {
        items.push(item);
    } else if let Some(last) = items.last_mut() {
        insert_list_item_at_depth(&mut last.children, item, depth - 1);
    } else {
        // no parent at this depth; keep the item rather than drop it
        items.push(item);
    }
}
