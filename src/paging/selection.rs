use super::{AggregateError, Aggregator, AuthContext, Notice, PageSource};

/// Re-runs a dependent traversal whenever the selected key changes.
///
/// `bind` turns a key into the page source of that key's collection, e.g. a
/// playlist id into the source of that playlist's tracks. Every chain is bound
/// to the key it was started for, so pages of a previously selected key can
/// only ever land in that key's own slot.
pub struct Selection<T, B> {
    selected: Option<String>,
    bind: B,
    aggregator: Aggregator<T>,
}

impl<T, B> Selection<T, B>
where
    T: Send + 'static,
{
    pub fn new(aggregator: Aggregator<T>, bind: B) -> Self {
        Self {
            selected: None,
            bind,
            aggregator,
        }
    }

    /// Selects `key` and starts fetching its collection from scratch.
    ///
    /// The selection is only changed if the traversal could be started.
    pub fn select<S>(
        &mut self,
        key: impl Into<String>,
        auth: &AuthContext,
    ) -> Result<(), AggregateError>
    where
        S: PageSource<T>,
        B: Fn(&str) -> S,
    {
        let key = key.into();
        let source = (self.bind)(&key);
        self.aggregator.begin(key.clone(), source, auth)?;
        self.selected = Some(key);
        Ok(())
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_items(&self) -> &[T] {
        match &self.selected {
            Some(key) => self.aggregator.items(key),
            None => &[],
        }
    }

    /// True while the collection of the selected key is still being fetched.
    pub fn is_busy(&self) -> bool {
        self.selected
            .as_deref()
            .is_some_and(|key| self.aggregator.is_busy_for(key))
    }

    /// Pumps until the selected traversal terminates.
    pub async fn wait_selected(&mut self) -> Option<Notice> {
        let key = self.selected.clone()?;
        self.aggregator.wait_for(&key).await
    }

    pub fn aggregator(&self) -> &Aggregator<T> {
        &self.aggregator
    }

    pub fn aggregator_mut(&mut self) -> &mut Aggregator<T> {
        &mut self.aggregator
    }
}
