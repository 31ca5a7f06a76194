//! Behavior of list normalization and in-memory search over the public API,
//! covering every response layout the backend is known to produce.

use careerlink::domain::{Job, JobType};
use careerlink::normalize::{
    is_clean, normalize_entity, normalize_list, normalize_list_as, Normalizer, Pagination,
    RefPolicy,
};
use careerlink::query::{query, FilterSpec};
use serde_json::{json, Value};

mod common {
    use careerlink::domain::Job;
    use serde_json::json;

    pub(super) fn job(index: usize, job_type: &str, location: &str) -> Job {
        serde_json::from_value(json!({
            "id": index,
            "title": format!("Position {index}"),
            "company": "Lotus Labs",
            "companyId": 1,
            "location": location,
            "type": job_type,
            "experienceLevel": "entry",
            "postedDate": "2025-09-01T08:00:00Z",
            "employerId": 1,
        }))
        .expect("job fixture deserializes")
    }

    pub(super) fn jobs(count: usize) -> Vec<Job> {
        (1..=count)
            .map(|index| {
                let job_type = if index % 2 == 0 { "full-time" } else { "internship" };
                let location = if index % 3 == 0 { "Da Nang" } else { "Hanoi" };
                job(index, job_type, location)
            })
            .collect()
    }
}

fn supported_shapes() -> Vec<Value> {
    vec![
        json!({
            "items": [{ "$id": "1", "id": 1, "tags": { "$id": "2", "$values": ["a"] } }],
            "pagination": { "page": 1, "pageSize": 10, "total": 1 }
        }),
        json!({ "$id": "1", "$values": [{ "$id": "2", "id": 1 }, { "$ref": "2" }] }),
        json!({
            "jobs": { "$id": "1", "$values": [{ "$id": "2", "id": 1, "owner": { "$ref": "2" } }] },
            "totalCount": 14,
            "page": 2,
            "pageSize": 5
        }),
        json!({
            "pagination": { "page": 1, "limit": 20, "total": 2 },
            "data": [{ "$id": "1", "id": 1 }, { "$id": "2", "id": 2 }]
        }),
        json!([{ "$id": "1", "nested": [{ "$id": "2", "$values": [] }] }]),
        json!({ "unexpected": true }),
    ]
}

#[test]
fn every_supported_shape_yields_clean_items_and_consistent_pages() {
    for raw in supported_shapes() {
        let page = normalize_list(raw.clone(), 10);

        for item in &page.items {
            assert!(is_clean(item), "wrapper keys survived in {item} from {raw}");
        }

        let Pagination {
            limit,
            total,
            total_pages,
            ..
        } = page.pagination;
        assert!(limit > 0);
        assert_eq!(total_pages, total.div_ceil(limit), "pages for {raw}");
    }
}

#[test]
fn enveloped_values_wrapper_scenario() {
    let raw = json!({
        "data": { "$values": [{ "id": "1", "$id": "2", "name": "A" }] },
        "pagination": null
    });

    let page = normalize_list(raw, 10);

    assert_eq!(page.items, vec![json!({ "id": "1", "name": "A" })]);
    assert_eq!(page.pagination, Pagination::new(1, 10, 1));
    assert_eq!(page.pagination.total_pages, 1);
}

#[test]
fn empty_array_has_no_pages() {
    let page = normalize_list(json!([]), 10);

    assert!(page.items.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.total_pages, 0);
}

#[test]
fn named_collection_keeps_server_counts() {
    let raw = json!({
        "jobs": { "$values": [{ "id": 6 }, { "id": 7 }] },
        "totalCount": 12,
        "page": 2,
        "pageSize": 5,
        "totalPages": 3
    });

    let page = normalize_list(raw, 10);

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.page, 2);
    assert_eq!(page.pagination.limit, 5);
    assert_eq!(page.pagination.total, 12);
    assert_eq!(page.pagination.total_pages, 3);
}

#[test]
fn cleaning_is_a_fixed_point() {
    let samples = [
        json!(null),
        json!("plain"),
        json!([1, { "$id": "1", "$values": [{ "$ref": "1" }] }]),
        json!({ "$id": "1", "a": { "$values": "not an array" }, "b": [[{ "$id": "3" }]] }),
    ];

    for raw in samples {
        let once = normalize_entity(raw.clone());
        assert_eq!(normalize_entity(once.clone()), once, "not idempotent for {raw}");
        assert!(is_clean(&once));
    }
}

#[test]
fn shared_references_resolve_only_when_requested() {
    let raw = json!({
        "$values": [
            { "$id": "2", "id": "e1", "company": { "$id": "3", "name": "Lotus Labs" } },
            { "$id": "4", "id": "e2", "company": { "$ref": "3" } }
        ]
    });

    let dropped = normalize_list(raw.clone(), 10);
    assert_eq!(dropped.items[1]["company"], json!({}));

    let resolved = Normalizer::new(10)
        .with_ref_policy(RefPolicy::Resolve)
        .list(raw);
    assert_eq!(resolved.items[1]["company"], json!({ "name": "Lotus Labs" }));
}

#[test]
fn typed_lists_skip_items_that_do_not_fit() {
    let mut encoded = serde_json::to_value(common::jobs(2)).expect("jobs serialize");
    if let Value::Array(items) = &mut encoded {
        items.push(json!({ "id": 99, "title": "missing required fields" }));
    }

    let page = normalize_list_as::<Job>(json!({ "$values": encoded }), 10);

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 3);
}

#[test]
fn third_page_of_twenty_five_jobs_holds_the_last_five() {
    let jobs = common::jobs(25);
    let filters = FilterSpec {
        page: Some(3),
        limit: Some(10),
        ..FilterSpec::default()
    };

    let page = query(&jobs, &filters);

    let ids: Vec<&str> = page.items.iter().map(|job| job.id.as_str()).collect();
    assert_eq!(ids, vec!["21", "22", "23", "24", "25"]);
    assert_eq!(page.pagination.total, 25);
    assert_eq!(page.pagination.total_pages, 3);
}

#[test]
fn totals_count_matches_before_slicing() {
    let jobs = common::jobs(25);
    let filters = FilterSpec {
        location: Some("hanoi".to_string()),
        job_type: Some(JobType::FullTime),
        limit: Some(3),
        ..FilterSpec::default()
    };

    let expected = jobs
        .iter()
        .filter(|job| job.location == "Hanoi" && job.job_type == JobType::FullTime)
        .count();
    let page = query(&jobs, &filters);

    assert_eq!(page.pagination.total, expected);
    assert_eq!(page.items.len(), 3.min(expected));
    assert!(page
        .items
        .iter()
        .all(|job| job.location == "Hanoi" && job.job_type == JobType::FullTime));
}
