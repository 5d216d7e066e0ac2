//! Live, filterable, grouped lists over the catalog and the playlist store

mod action;
mod grouped;
pub mod headers;
pub mod lists;
mod selection;

pub use action::{actions, Action, ListKind};
pub use grouped::GroupedResult;
pub use selection::{Level, SelectionState};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use crate::filter::{Filter, OrderKey};
use crate::notify::{Notifier, Toast, VIEW_TYPE_UNSUPPORTED};
use crate::preferences::FilterStore;
use crate::source::{ChangeStream, Record, SourceError};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A steady stream of triggers still re-evaluates after this many quiet periods
const MAX_WAIT_PERIODS: u32 = 4;

/// Latest published result; None until the first fetch succeeds
pub type Snapshot<T> = Option<Arc<GroupedResult<T>>>;

/// What a [`Directory`] lists and how it groups it
#[async_trait::async_trait]
pub trait DirectorySource: Send + Sync + 'static {
    type Item: Record;

    fn kind(&self) -> ListKind;

    /// Stable name, also the key of the remembered filter
    fn name(&self) -> String;

    fn subscribe(&self) -> ChangeStream;

    /// Items matching the filter, ordered in the filter's direction
    async fn fetch(&self, filter: &Filter) -> Result<Vec<Self::Item>, SourceError>;

    /// Group header of `item` under `order`
    fn header(&self, item: &Self::Item, order: OrderKey) -> String;
}

/// A live list.
///
/// Owns one background task that re-fetches whenever the filter changes or the
/// source reports a change, coalescing bursts into a single fetch. Results are
/// published through a watch channel; a failed fetch keeps the previous result
/// and raises one error toast. Dropping the directory stops the task and its
/// change subscription.
///
/// Must be created inside a tokio runtime.
pub struct Directory<S: DirectorySource> {
    source: Arc<S>,
    notifier: Arc<dyn Notifier>,
    store: Option<FilterStore>,
    filter_tx: watch::Sender<Filter>,
    data_rx: watch::Receiver<Snapshot<S::Item>>,
    selection: SelectionState,
    query: String,
    task: JoinHandle<()>,
}

impl<S: DirectorySource> Directory<S> {
    pub fn new(source: S, notifier: Arc<dyn Notifier>, filter: Filter, debounce: Duration) -> Self {
        let source = Arc::new(source);
        let query = filter.query.clone().unwrap_or_default();
        let (filter_tx, filter_rx) = watch::channel(filter);
        let (data_tx, data_rx) = watch::channel(None);

        // Subscribe before the first fetch so no change slips through
        let changes = source.subscribe();
        info!("Opening {} list", source.name());
        let task = tokio::spawn(run(
            source.clone(),
            filter_rx,
            changes,
            data_tx,
            notifier.clone(),
            debounce,
        ));

        Directory {
            source,
            notifier,
            store: None,
            filter_tx,
            data_rx,
            selection: SelectionState::new(),
            query,
            task,
        }
    }

    /// Open with the filter remembered for this list, saving later changes back
    pub async fn open(
        source: S,
        notifier: Arc<dyn Notifier>,
        store: FilterStore,
        debounce: Duration,
    ) -> Self {
        let name = source.name();
        let orders = source.kind().orders();
        let filter = match store.load(&name).await {
            Ok(Some(filter)) if orders.contains(&filter.order) => filter,
            Ok(_) => Filter::default(),
            Err(e) => {
                warn!("Ignoring stored filter for {}: {}", name, e);
                Filter::default()
            }
        };

        let mut directory = Self::new(source, notifier, filter, debounce);
        directory.store = Some(store);
        directory
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn kind(&self) -> ListKind {
        self.source.kind()
    }

    pub fn orders(&self) -> Vec<OrderKey> {
        self.kind().orders()
    }

    pub fn current_filter(&self) -> Filter {
        self.filter_tx.borrow().clone()
    }

    /// The latest grouped result
    pub fn result(&self) -> Snapshot<S::Item> {
        self.data_rx.borrow().clone()
    }

    /// Watch published results
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S::Item>> {
        self.data_rx.clone()
    }

    /// Replace order and direction, keeping the query
    pub async fn filter(&self, ascending: bool, order: OrderKey) {
        let filter = self.current_filter().with_order(order, ascending);
        self.apply(filter).await;
    }

    /// The live query buffer
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Edit the query; the list follows once typing settles
    pub async fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
        let filter = self.current_filter().with_query(Some(text));
        self.apply(filter).await;
    }

    async fn apply(&self, filter: Filter) {
        let changed = self.filter_tx.send_if_modified(|current| {
            if *current == filter {
                false
            } else {
                *current = filter.clone();
                true
            }
        });
        if !changed {
            return;
        }

        debug!("{} filter now {:?}", self.source.name(), filter);
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.source.name(), &filter).await {
                warn!("Failed to remember filter for {}: {}", self.source.name(), e);
            }
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Toggle one item; returns whether it is selected afterwards
    pub fn select(&mut self, key: &str) -> bool {
        self.prune();
        self.selection.toggle(key)
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn focus(&mut self, key: Option<&str>) {
        self.selection.focus(key.map(str::to_string));
    }

    /// Select every item currently listed
    pub fn select_all(&mut self) {
        self.prune();
        if let Some(result) = self.result() {
            self.selection.select_all(result.items().map(Record::key));
        }
    }

    pub fn group_level(&self, header: &str) -> Level {
        let keys = self.group_keys(header);
        self.selection.level(keys.iter().map(String::as_str))
    }

    /// Select the whole group, or clear it when it is fully selected
    pub fn select_group(&mut self, header: &str) -> Level {
        self.prune();
        let keys = self.group_keys(header);
        self.selection.toggle_group(&keys)
    }

    /// Selection restricted to items of the latest result
    fn live_selection(&self) -> SelectionState {
        let mut selection = self.selection.clone();
        if let Some(result) = self.result() {
            let listed: HashSet<String> = result.items().map(Record::key).collect();
            selection.retain(|key| listed.contains(key));
        }
        selection
    }

    /// Forget selected keys the latest result no longer lists
    fn prune(&mut self) {
        self.selection = self.live_selection();
    }

    fn group_keys(&self, header: &str) -> Vec<String> {
        self.data_rx
            .borrow()
            .as_ref()
            .and_then(|result| result.get(header).map(|items| items.iter().map(Record::key).collect()))
            .unwrap_or_default()
    }

    pub fn actions(&self) -> Vec<Action> {
        actions(&self.live_selection(), self.kind())
    }

    pub fn primary_actions(&self) -> Vec<Action> {
        self.kind().primary_actions()
    }

    /// All listed items, group by group
    pub fn items(&self) -> Vec<S::Item> {
        self.result()
            .map(|result| result.items().cloned().collect())
            .unwrap_or_default()
    }

    /// Selected items in list order
    pub fn selected_items(&self) -> Vec<S::Item> {
        self.result()
            .map(|result| {
                result
                    .items()
                    .filter(|item| self.selection.is_selected(&item.key()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn focused_item(&self) -> Option<S::Item> {
        let focused = self.selection.focused()?;
        self.result()?.items().find(|item| item.key() == focused).cloned()
    }

    /// What an item action applies to: the selection, or else the focused item
    pub fn targets(&self) -> Vec<S::Item> {
        if self.live_selection().is_empty() {
            self.focused_item().into_iter().collect()
        } else {
            self.selected_items()
        }
    }

    /// Only one layout exists; say so instead of failing
    pub async fn toggle_view_type(&self) {
        self.notifier.notify(Toast::new(VIEW_TYPE_UNSUPPORTED)).await;
    }
}

impl<S: DirectorySource> Drop for Directory<S> {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Closed {} list", self.source.name());
    }
}

async fn run<S: DirectorySource>(
    source: Arc<S>,
    mut filter_rx: watch::Receiver<Filter>,
    changes: ChangeStream,
    data_tx: watch::Sender<Snapshot<S::Item>>,
    notifier: Arc<dyn Notifier>,
    debounce: Duration,
) {
    let mut changes = Some(changes);

    let filter = filter_rx.borrow_and_update().clone();
    evaluate(source.as_ref(), &filter, &data_tx, &notifier).await;

    loop {
        tokio::select! {
            changed = filter_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            alive = next_change(&mut changes) => {
                if !alive {
                    continue;
                }
            }
        }

        // Quiet period restarts on every further trigger, up to a deadline
        let deadline = Instant::now() + debounce * MAX_WAIT_PERIODS;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(debounce) => break,
                _ = tokio::time::sleep_until(deadline) => break,
                changed = filter_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = next_change(&mut changes) => {}
            }
        }

        let filter = filter_rx.borrow_and_update().clone();
        evaluate(source.as_ref(), &filter, &data_tx, &notifier).await;
    }

    debug!("{} pipeline stopped", source.name());
}

/// Wait for the next change event. False once the stream has closed; after
/// that it never resolves.
async fn next_change(changes: &mut Option<ChangeStream>) -> bool {
    let Some(rx) = changes.as_mut() else {
        return std::future::pending().await;
    };

    match rx.recv().await {
        Ok(_) => true,
        // Missed events still mean the data moved
        Err(RecvError::Lagged(_)) => true,
        Err(RecvError::Closed) => {
            *changes = None;
            false
        }
    }
}

async fn evaluate<S: DirectorySource>(
    source: &S,
    filter: &Filter,
    data_tx: &watch::Sender<Snapshot<S::Item>>,
    notifier: &Arc<dyn Notifier>,
) {
    match source.fetch(filter).await {
        Ok(items) => {
            let order = filter.order;
            let grouped =
                GroupedResult::build(items, filter.ascending, |item| source.header(item, order));
            trace!(
                "{}: {} items in {} groups",
                source.name(),
                grouped.item_count(),
                grouped.len()
            );
            data_tx.send_replace(Some(Arc::new(grouped)));
        }
        Err(e) => {
            error!("Failed to load {}: {}", source.name(), e);
            let notifier = notifier.clone();
            tokio::spawn(async move {
                notifier.notify(Toast::unknown_error()).await;
            });
        }
    }
}
