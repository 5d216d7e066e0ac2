use std::collections::HashMap;

/// Items bucketed under display headers.
///
/// Headers keep the order in which they were first produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedResult<T> {
    groups: Vec<(String, Vec<T>)>,
    index: HashMap<String, usize>,
}

impl<T> Default for GroupedResult<T> {
    fn default() -> Self {
        GroupedResult {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> GroupedResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket records that arrive in the requested direction.
    ///
    /// Headers come out in ascending first-seen order either way; for a
    /// descending list only the items inside each group are reversed.
    pub fn build<F>(mut items: Vec<T>, ascending: bool, header: F) -> Self
    where
        F: Fn(&T) -> String,
    {
        if !ascending {
            items.reverse();
        }

        let mut result = GroupedResult::new();
        for item in items {
            let key = header(&item);
            result.push(key, item);
        }

        if !ascending {
            for (_, members) in result.groups.iter_mut() {
                members.reverse();
            }
        }
        result
    }

    /// Append to `header`, opening the group at the end if it is new
    pub fn push(&mut self, header: String, item: T) {
        match self.index.get(&header) {
            Some(&pos) => self.groups[pos].1.push(item),
            None => {
                self.index.insert(header.clone(), self.groups.len());
                self.groups.push((header, vec![item]));
            }
        }
    }

    pub fn get(&self, header: &str) -> Option<&[T]> {
        self.index
            .get(header)
            .map(|&pos| self.groups[pos].1.as_slice())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(h, _)| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.groups.iter().map(|(h, items)| (h.as_str(), items.as_slice()))
    }

    /// All items, group by group
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.groups.iter().flat_map(|(_, items)| items.iter())
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|(_, items)| items.len()).sum()
    }
}
