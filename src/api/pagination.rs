use sea_orm::{ConnectionTrait, PaginatorTrait, SelectorTrait};
use serde::{Deserialize, Serialize};

use crate::api::request_result::RequestError;
use crate::config::PaginationConfig;

/// `?page=&page_size=` query parameters. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// One page of a list endpoint.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub num_pages: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Split off the rows, so they can be rendered with extra queries and put
    /// back with [`Page::with_results`].
    pub fn take_results(self) -> (Page<()>, Vec<T>) {
        let results = self.results;
        let totals = Page {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            num_pages: self.num_pages,
            results: Vec::new(),
        };
        (totals, results)
    }
}

impl Page<()> {
    pub fn with_results<U>(self, results: Vec<U>) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            num_pages: self.num_pages,
            results,
        }
    }
}

impl PageParams {
    fn page_size(&self, config: &PaginationConfig) -> u64 {
        self.page_size
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1))
    }
}

/// Count and fetch one page of an already scoped query.
///
/// Scoping filters must be applied to `select` before calling this, so both the
/// count and the page only ever contain rows the caller may see.
pub async fn paginate<'db, C, S>(
    db: &'db C,
    select: S,
    params: PageParams,
    config: &PaginationConfig,
) -> Result<Page<<S::Selector as SelectorTrait>::Item>, RequestError>
where
    C: ConnectionTrait,
    S: PaginatorTrait<'db, C>,
{
    let page_size = params.page_size(config);
    let page = params.page.unwrap_or(1);

    let paginator = select.paginate(db, page_size);
    let totals = paginator.num_items_and_pages().await?;

    if page == 0 || (page > 1 && page > totals.number_of_pages) {
        return Err(RequestError::NotFound);
    }

    let results = paginator.fetch_page(page - 1).await?;

    Ok(Page {
        count: totals.number_of_items,
        page,
        page_size,
        num_pages: totals.number_of_pages,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_page_size: 20,
            max_page_size: 100,
        }
    }

    #[test]
    fn test_page_size_defaults_and_limits() {
        assert_eq!(PageParams::default().page_size(&config()), 20);
        let huge = PageParams {
            page: None,
            page_size: Some(10_000),
        };
        assert_eq!(huge.page_size(&config()), 100);
        let zero = PageParams {
            page: None,
            page_size: Some(0),
        };
        assert_eq!(zero.page_size(&config()), 1);
    }

    #[test]
    fn test_zero_maximum_does_not_panic() {
        let config = PaginationConfig {
            default_page_size: 20,
            max_page_size: 0,
        };
        assert_eq!(PageParams::default().page_size(&config), 1);
    }

    #[test]
    fn test_rerendering_keeps_totals() {
        let page = Page {
            count: 3,
            page: 1,
            page_size: 2,
            num_pages: 2,
            results: vec![1, 2],
        };
        let (totals, rows) = page.take_results();
        let mapped = totals.with_results(rows.into_iter().map(|n| n * 10).collect());
        assert_eq!(mapped.results, vec![10, 20]);
        assert_eq!(mapped.count, 3);
        assert_eq!(mapped.num_pages, 2);
    }
}
