use engine::{tie_probability, win_probability, Die, Probability, ProbabilityTable};
use proptest::prelude::*;

fn die_strategy() -> impl Strategy<Value = Die> {
    prop::collection::vec(-6i64..6, 1..8).prop_map(|faces| Die::new(&faces).unwrap())
}

proptest! {
    #[test]
    fn win_lose_tie_mass_sums_to_one(a in die_strategy(), b in die_strategy()) {
        let ab = win_probability(&a, &b);
        let ba = win_probability(&b, &a);
        let tie = tie_probability(&a, &b);
        let total = (a.len() * b.len()) as u64;
        prop_assert_eq!(ab.denominator, total);
        prop_assert_eq!(ba.denominator, total);
        prop_assert_eq!(ab.numerator + ba.numerator + tie.numerator, total);
    }

    #[test]
    fn diagonal_is_always_half(dice in prop::collection::vec(die_strategy(), 1..6)) {
        let table = ProbabilityTable::build(&dice);
        for i in 0..dice.len() {
            prop_assert_eq!(table.get(i, i), Probability::HALF);
        }
    }
}

#[test]
fn canonical_table_snapshot() {
    let dice: Vec<Die> = ["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let table = ProbabilityTable::build(&dice);
    let rendered = table
        .rows()
        .map(|row| {
            row.iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    0.50 0.56 0.44
    0.44 0.50 0.56
    0.56 0.44 0.50
    ");
}
