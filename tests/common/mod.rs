use proptest::prelude::*;

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

#[allow(dead_code)]
pub(super) type SmallIntPairs = Vec<(u16, u16)>;

#[allow(dead_code)]
pub(super) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}

#[allow(dead_code)]
pub(super) fn string_u16_pairs() -> impl Strategy<Value = Vec<(String, u16)>> {
    prop::collection::vec(("[a-z]{0,2}", 0u16..1024u16), 0..512)
}

/// One step of a sequence workload.  Indexes are reduced modulo the current
/// length (plus one for inserts) when the step is applied.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub(super) enum SeqOp {
    PushBack(u16),
    PushFront(u16),
    PopBack,
    PopFront,
    Insert(usize, u16),
    Erase(usize),
    Set(usize, u16),
}

#[allow(dead_code)]
pub(super) fn seq_ops() -> impl Strategy<Value = Vec<SeqOp>> {
    let op = prop_oneof![
        3 => any::<u16>().prop_map(SeqOp::PushBack),
        3 => any::<u16>().prop_map(SeqOp::PushFront),
        1 => Just(SeqOp::PopBack),
        1 => Just(SeqOp::PopFront),
        3 => (any::<usize>(), any::<u16>()).prop_map(|(i, x)| SeqOp::Insert(i, x)),
        2 => any::<usize>().prop_map(SeqOp::Erase),
        1 => (any::<usize>(), any::<u16>()).prop_map(|(i, x)| SeqOp::Set(i, x)),
    ];
    prop::collection::vec(op, 0..512)
}

/// `Some(x)` pushes `x`; `None` pops.
#[allow(dead_code)]
pub(super) fn heap_ops() -> impl Strategy<Value = Vec<Option<u16>>> {
    prop::collection::vec(prop::option::weighted(0.7, 0u16..1024u16), 0..512)
}
