use std::future::Future;

use futures::stream::{Stream, StreamExt};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::types::Page;

/// Page size requested by the paginated endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Turn a single-page fetch into a stream of the items found under `key`.
///
/// `fetch` is called with `Page { starts_at: p * page_size }` for
/// `p = 0, 1, ..`; anything else it needs is captured by the closure. A page
/// is only requested once every item of the previous one has been yielded,
/// and fetching stops once `total <= p * page_size`. A missing `total` is
/// read as zero and a missing item array as empty. The first failed fetch is
/// yielded as an error and ends the stream. A `page_size` of zero is read as
/// one.
pub fn paginate<'a, F, Fut>(
    key: &'a str,
    page_size: u32,
    mut fetch: F,
) -> impl Stream<Item = Result<Value>> + 'a
where
    F: FnMut(Page) -> Fut + 'a,
    Fut: Future<Output = Result<Value>> + 'a,
{
    async_stream::try_stream! {
        let size = i64::from(page_size.max(1));
        let mut page: i64 = 0;

        loop {
            let starts_at = (page * size) as u64;
            debug!(starts_at, page_size, key, "Fetching page");
            let mut response = fetch(Page::starting_at(starts_at)).await?;
            page += 1;

            let total = response.get("total").and_then(Value::as_i64).unwrap_or(0);
            let items = match response.get_mut(key).map(Value::take) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };

            for item in items {
                yield item;
            }

            if total <= page * size {
                debug!(total, pages = page, "Finished pagination");
                break;
            }
        }
    }
}

/// Drain a paginated stream, stopping early once `limit` items are in hand.
pub async fn collect_items<S, T>(stream: S, limit: Option<usize>) -> Result<Vec<T>>
where
    S: Stream<Item = Result<T>>,
{
    futures::pin_mut!(stream);
    let mut all_items = Vec::new();

    if limit == Some(0) {
        return Ok(all_items);
    }

    while let Some(item) = stream.next().await {
        all_items.push(item?);

        if let Some(limit) = limit {
            if all_items.len() >= limit {
                break;
            }
        }
    }

    Ok(all_items)
}
