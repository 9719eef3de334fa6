use crate::{math::Partition, prelude::*};

/// Builds the quotient of `dfa` by `partition`, which has to be a congruence: states in the
/// same block agree on finality, and their successors on every symbol lie in the same block.
///
/// Block `b` of the partition becomes state `b` of the result. It is initial if it contains
/// an initial state of `dfa` and final if its states are final. Transitions are taken from an
/// arbitrary member of each block.
pub fn synthesize(dfa: &Dfa, partition: &Partition) -> Dfa {
    assert_eq!(dfa.state_count(), partition.state_count());
    let mut quotient = Dfa::allocate(dfa.alphabet_size(), partition.size());
    for (block, members) in partition.iter().enumerate() {
        let block = block as StateId;
        let representative = members[0];
        debug_assert!(
            members.iter().all(|q| {
                dfa.is_final(*q) == dfa.is_final(representative)
                    && dfa.symbols().all(|a| {
                        partition.block_of(dfa.successor(*q, a))
                            == partition.block_of(dfa.successor(representative, a))
                    })
            }),
            "block {block} is not closed under the transition function"
        );

        quotient.set_initial(block, members.iter().any(|q| dfa.is_initial(*q)));
        quotient.set_final(block, dfa.is_final(representative));
        for a in dfa.symbols() {
            let target = partition.block_of(dfa.successor(representative, a));
            quotient.set_transition(block, a, target as StateId);
        }
    }
    quotient
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::BitSet;

    #[test]
    fn quotient_by_equivalence() {
        let dfa = Dfa::from_parts(
            2,
            4,
            [0],
            [3],
            [
                (0, 0, 1),
                (0, 1, 2),
                (1, 0, 3),
                (1, 1, 1),
                (2, 0, 3),
                (2, 1, 2),
                (3, 0, 3),
                (3, 1, 3),
            ],
        )
        .unwrap();
        let partition = Partition::from_representatives(&[0, 1, 1, 3]);
        let quotient = synthesize(&dfa, &partition);
        assert_eq!(quotient.state_count(), 3);
        assert!(quotient.is_initial(0));
        assert!(quotient.is_final(2));
        assert_eq!(quotient.successor(0, 0), 1);
        assert_eq!(quotient.successor(0, 1), 1);
        assert_eq!(quotient.successor(1, 1), 1);
        assert_eq!(quotient.successor(1, 0), 2);
        assert_eq!(
            quotient.final_states(),
            &BitSet::from_iter_with_capacity(3, [2])
        );
    }

    #[test]
    #[should_panic]
    fn partitions_must_be_congruences() {
        let dfa = Dfa::from_parts(2, 2, [0], [1], [(0, 0, 1)]).unwrap();
        synthesize(&dfa, &Partition::new(3));
    }
}
