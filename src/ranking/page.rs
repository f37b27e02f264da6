/// Clamped page slicing over a ranked list
///
/// Page numbers are 1-based. An out-of-range page yields an empty slice,
/// never an error, and the page count never drops below 1 so callers can
/// always render "page 1 of 1" for an empty result set.

/// One page of a ranked list plus the page count for the whole list.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
}

/// Slice out the given 1-based page.
///
/// `total_pages = max(1, ceil(len / page_size))`; the slice is
/// `[(page-1)*size, page*size)` clamped to the list bounds. Page 0 and
/// pages past the end return an empty slice. A zero page size is treated
/// as 1, keeping this a total function.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);

    let start = match page.checked_sub(1) {
        Some(p) => p.saturating_mul(page_size),
        None => {
            return Page {
                items: &[],
                total_pages,
            }
        }
    };
    if start >= items.len() {
        return Page {
            items: &[],
            total_pages,
        };
    }
    let end = start.saturating_add(page_size).min(items.len());
    Page {
        items: &items[start..end],
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_partition_the_list() {
        let items: Vec<i32> = (0..5).collect();

        let page1 = paginate(&items, 1, 2);
        assert_eq!(page1.items, &[0, 1]);
        assert_eq!(page1.total_pages, 3);

        let page2 = paginate(&items, 2, 2);
        assert_eq!(page2.items, &[2, 3]);

        let page3 = paginate(&items, 3, 2);
        assert_eq!(page3.items, &[4]);
    }

    #[test]
    fn test_exact_multiple_has_no_ragged_page() {
        let items: Vec<i32> = (0..4).collect();
        assert_eq!(paginate(&items, 2, 2).total_pages, 2);
        assert_eq!(paginate(&items, 2, 2).items, &[2, 3]);
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_an_error() {
        let items: Vec<i32> = (0..5).collect();
        let page = paginate(&items, 4, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_zero_is_out_of_range() {
        let items: Vec<i32> = (0..5).collect();
        assert!(paginate(&items, 0, 2).items.is_empty());
    }

    #[test]
    fn test_empty_list_still_reports_one_page() {
        let items: Vec<i32> = Vec::new();
        let page = paginate(&items, 1, 12);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_zero_page_size_behaves_as_one() {
        let items: Vec<i32> = (0..3).collect();
        let page = paginate(&items, 2, 0);
        assert_eq!(page.items, &[1]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_concatenated_pages_reconstruct_the_list() {
        let items: Vec<i32> = (0..10).collect();
        let total = paginate(&items, 1, 3).total_pages;
        let mut rebuilt = Vec::new();
        for page in 1..=total {
            rebuilt.extend_from_slice(paginate(&items, page, 3).items);
        }
        assert_eq!(rebuilt, items);
    }
}
