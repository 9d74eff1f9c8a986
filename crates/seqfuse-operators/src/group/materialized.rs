//! Default-runtime group-by: collect every group, then run the selector.

use seqfuse_core::id::GroupId;

use super::equivalence::Equivalence;
use super::grouping::Grouping;
use super::table::KeyIndex;
use crate::runtime;
use crate::seq::Seq;
use crate::traits::Result;

pub(crate) fn group_by<T, K, R, KF, RF, E>(
    source: Seq<T>,
    key_of: KF,
    result_of: RF,
    equivalence: E,
) -> Seq<R>
where
    T: Clone + 'static,
    K: Clone + 'static,
    R: 'static,
    KF: Fn(&T) -> K + 'static,
    RF: Fn(Grouping<K, T>) -> Result<R> + 'static,
    E: Equivalence<K> + 'static,
{
    Seq::from_elements(runtime::deferred(move || {
        let mut index = KeyIndex::new(equivalence, 0);
        let mut members: Vec<Vec<T>> = Vec::new();
        for item in source.into_elements() {
            let item = item?;
            let key = key_of(&item);
            match index.find(&key) {
                (_, Some(group)) => members[group.get()].push(item),
                (hash, None) => {
                    index.insert(hash, key);
                    members.push(vec![item]);
                }
            }
        }

        index
            .into_keys()
            .into_iter()
            .zip(members)
            .enumerate()
            .map(|(i, (key, items))| result_of(Grouping::materialized(GroupId::new(i), key, items)))
            .collect()
    }))
}
