//! Patent record types serialized into the output JSON

use serde::Serialize;

/// Everything extracted from one patent detail page.
///
/// Field order here is the order the fields appear in the serialized
/// output. The patent number is shown in progress output but stays out
/// of the JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct PatentRecord {
    #[serde(skip_serializing)]
    pub patent_number: String,
    pub link_to_page: String,
    pub description: String,
    pub assignee: String,
    pub award_date: String,
    pub link_to_pdf: String,
    pub inventors: Vec<Inventor>,
}

/// One inventor parsed from the detail page's inventor field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inventor {
    pub last: String,
    pub rest: String,
    pub city: String,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_exactly_the_output_fields() {
        let record = PatentRecord {
            patent_number: "11,268,098".to_string(),
            link_to_page: "http://patft.uspto.gov/netacgi/nph-Parser?r=1".to_string(),
            description: "Widget".to_string(),
            assignee: "Acme Corp.".to_string(),
            award_date: "March 1, 2022".to_string(),
            link_to_pdf: "http://pdfpiw.uspto.gov/11268098".to_string(),
            inventors: vec![Inventor {
                last: "DOE".to_string(),
                rest: "JOHN".to_string(),
                city: "AUSTIN".to_string(),
                state: "TX".to_string(),
            }],
        };

        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        // Map keys come back sorted; patent_number must not be among them.
        assert_eq!(
            keys,
            [
                "assignee",
                "award_date",
                "description",
                "inventors",
                "link_to_page",
                "link_to_pdf",
            ]
        );

        let inventor = &value["inventors"][0];
        assert_eq!(inventor["last"], "DOE");
        assert_eq!(inventor["rest"], "JOHN");
        assert_eq!(inventor["city"], "AUSTIN");
        assert_eq!(inventor["state"], "TX");
    }
}
