pub const MAX_VISIBLE_PAGES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

pub fn page_window(current: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= 1 {
        return Vec::new();
    }
    if total_pages <= MAX_VISIBLE_PAGES + 2 {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let half = MAX_VISIBLE_PAGES / 2;
    let last_interior = total_pages - 1;
    let mut start = current.saturating_sub(half).max(2);
    let mut end = current.saturating_add(half).min(last_interior);

    if (end + 1).saturating_sub(start) < MAX_VISIBLE_PAGES {
        if start == 2 {
            end = (start + MAX_VISIBLE_PAGES - 1).min(last_interior);
        } else {
            start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(2);
        }
    }

    let mut items = Vec::with_capacity(MAX_VISIBLE_PAGES as usize + 4);
    items.push(PageItem::Page(1));
    if start - 1 > 1 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if total_pages - end > 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total_pages));
    items
}
