use super::schema::FilterCriteria;
use url::form_urlencoded;

/// Build the `/api/papers` query string for a set of filters.
///
/// Only non-empty fields appear, in the order branch, subject, year,
/// semester, examType. Values are `application/x-www-form-urlencoded`,
/// so a space becomes `+`.
pub fn build_query(criteria: &FilterCriteria) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in criteria.fields() {
        if !value.is_empty() {
            query.append_pair(key, value);
        }
    }
    query.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_criteria_give_empty_query() {
        assert_eq!(build_query(&FilterCriteria::default()), "");
    }

    #[test]
    fn only_set_fields_are_included() {
        let criteria = FilterCriteria {
            branch: "CSE".into(),
            year: "2022".into(),
            ..Default::default()
        };
        assert_eq!(build_query(&criteria), "branch=CSE&year=2022");
    }

    #[test]
    fn canonical_order_and_camel_case_exam_type() {
        let criteria = FilterCriteria {
            exam_type: "MIDSEM".into(),
            semester: "4".into(),
            subject: "Signals".into(),
            branch: "ECE".into(),
            year: "2023".into(),
        };
        assert_eq!(
            build_query(&criteria),
            "branch=ECE&subject=Signals&year=2023&semester=4&examType=MIDSEM"
        );
    }

    #[test]
    fn no_empty_pairs_and_each_key_once() {
        let criteria = FilterCriteria {
            subject: "Operating Systems".into(),
            exam_type: "ENDSEM".into(),
            ..Default::default()
        };
        let query = build_query(&criteria);
        assert_eq!(query, "subject=Operating+Systems&examType=ENDSEM");
        for pair in query.split('&') {
            let (_, value) = pair.split_once('=').unwrap();
            assert!(!value.is_empty());
        }
        assert_eq!(query.matches("subject=").count(), 1);
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let criteria = FilterCriteria {
            subject: "C&C++/DS".into(),
            ..Default::default()
        };
        assert_eq!(build_query(&criteria), "subject=C%26C%2B%2B%2FDS");
    }

    #[test]
    fn star_stays_bare_and_tilde_is_escaped() {
        let criteria = FilterCriteria {
            subject: "a*b~c".into(),
            ..Default::default()
        };
        assert_eq!(build_query(&criteria), "subject=a*b%7Ec");
    }
}
