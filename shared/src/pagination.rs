//! 客户端分页计算模块
//!
//! 历史列表在客户端按固定页大小分页，这里只做下标运算。

/// 一页的切片范围与总页数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 当前页（1 起，已被钳制到有效范围）
    pub current: usize,
    /// 本页起始下标（含）
    pub start: usize,
    /// 本页结束下标（不含）
    pub end: usize,
    pub total_pages: usize,
}

impl Page {
    /// 计算第 `current` 页的切片范围
    ///
    /// `total_pages = ceil(len / size)`；第 1 页从下标 0 开始；
    /// 末页含 `len - (total_pages-1)*size` 条。空列表返回单个空页。
    pub fn paginate(len: usize, size: usize, current: usize) -> Self {
        debug_assert!(size > 0);
        let total_pages = len.div_ceil(size).max(1);
        let current = current.clamp(1, total_pages);
        let start = (current - 1) * size;
        let end = (start + size).min(len);
        Self {
            current,
            start,
            end,
            total_pages,
        }
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total_pages
    }

    /// 本页条数
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_of_len_over_size() {
        assert_eq!(Page::paginate(0, 10, 1).total_pages, 1);
        assert_eq!(Page::paginate(1, 10, 1).total_pages, 1);
        assert_eq!(Page::paginate(10, 10, 1).total_pages, 1);
        assert_eq!(Page::paginate(11, 10, 1).total_pages, 2);
        assert_eq!(Page::paginate(95, 10, 1).total_pages, 10);
    }

    #[test]
    fn first_page_starts_at_index_zero() {
        let page = Page::paginate(35, 10, 1);
        assert_eq!(page.start, 0);
        assert_eq!(page.end, 10);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let page = Page::paginate(35, 10, 4);
        assert_eq!(page.start, 30);
        assert_eq!(page.end, 35);
        assert_eq!(page.len(), 35 - 3 * 10);
        assert!(page.is_last());
    }

    #[test]
    fn exact_multiple_has_full_last_page() {
        let page = Page::paginate(30, 10, 3);
        assert_eq!(page.len(), 10);
        assert!(page.is_last());
    }

    #[test]
    fn current_page_is_clamped_into_range() {
        let page = Page::paginate(15, 10, 99);
        assert_eq!(page.current, 2);
        let page = Page::paginate(15, 10, 0);
        assert_eq!(page.current, 1);
    }

    #[test]
    fn empty_list_yields_single_empty_page() {
        let page = Page::paginate(0, 10, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.is_empty());
        assert!(page.is_first() && page.is_last());
    }
}
