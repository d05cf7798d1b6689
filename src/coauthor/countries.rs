use indexmap::IndexMap;
use serde::Serialize;

use crate::records::Record;

pub const TOP_COUNTRY_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedCountry {
    pub country: String,
    pub count: usize,
}

/// Country frequencies across all records, plus the most frequent few.
#[derive(Clone, Debug, Default)]
pub struct CountryRanking {
    tally: IndexMap<String, usize>,
    top: Vec<RankedCountry>,
}

impl CountryRanking {
    pub fn from_records(records: &[Record]) -> Self {
        let mut tally = IndexMap::new();
        for country in records.iter().filter_map(|record| record.country.as_ref()) {
            *tally.entry(country.clone()).or_insert(0usize) += 1;
        }

        let mut ranked = tally
            .iter()
            .map(|(country, &count)| RankedCountry {
                country: country.clone(),
                count,
            })
            .collect::<Vec<_>>();
        // stable: ties keep first-seen order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(TOP_COUNTRY_LIMIT);

        Self { tally, top: ranked }
    }

    pub fn top(&self) -> &[RankedCountry] {
        &self.top
    }

    pub fn rank_of(&self, country: &str) -> Option<usize> {
        self.top.iter().position(|ranked| ranked.country == country)
    }

    pub fn count(&self, country: &str) -> usize {
        self.tally.get(country).copied().unwrap_or(0)
    }

    pub fn distinct(&self) -> usize {
        self.tally.len()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn with_countries(countries: &[Option<&str>]) -> Vec<Record> {
        countries
            .iter()
            .map(|country| Record {
                country: country.map(str::to_owned),
                ..Record::default()
            })
            .collect()
    }

    #[test]
    fn ranks_by_count_then_first_seen() {
        let records = with_countries(&[
            Some("Chile"),
            Some("Peru"),
            None,
            Some("Peru"),
            Some("Chile"),
            Some("Cuba"),
            Some("Peru"),
        ]);
        let ranking = CountryRanking::from_records(&records);

        let order = ranking
            .top()
            .iter()
            .map(|ranked| (ranked.country.as_str(), ranked.count))
            .collect::<Vec<_>>();
        assert_eq!(order, vec![("Peru", 3), ("Chile", 2), ("Cuba", 1)]);
        assert_eq!(ranking.rank_of("Cuba"), Some(2));
        assert_eq!(ranking.count("Chile"), 2);
        assert_eq!(ranking.count("Narnia"), 0);
    }

    #[test]
    fn keeps_only_the_top_ten() {
        let names = (0..14).map(|index| format!("C{index}")).collect::<Vec<_>>();
        let mut countries = names.iter().map(|name| Some(name.as_str())).collect::<Vec<_>>();
        countries.push(Some("C13"));
        let ranking = CountryRanking::from_records(&with_countries(&countries));

        assert_eq!(ranking.distinct(), 14);
        assert_eq!(ranking.top().len(), TOP_COUNTRY_LIMIT);
        assert_eq!(ranking.top()[0].country, "C13");
        assert_eq!(ranking.top()[1].country, "C0");
        assert_eq!(ranking.rank_of("C12"), None);
    }

    proptest! {
        #[test]
        fn top_list_is_sorted_and_bounded(
            picks in prop::collection::vec(prop::option::of(0usize..15), 0..60)
        ) {
            let names = picks
                .iter()
                .map(|pick| pick.map(|index| format!("Country {index}")))
                .collect::<Vec<_>>();
            let records = names
                .iter()
                .map(|country| Record { country: country.clone(), ..Record::default() })
                .collect::<Vec<_>>();
            let ranking = CountryRanking::from_records(&records);

            prop_assert_eq!(ranking.top().len(), ranking.distinct().min(TOP_COUNTRY_LIMIT));
            for pair in ranking.top().windows(2) {
                prop_assert!(pair[0].count >= pair[1].count);
            }
        }
    }
}
