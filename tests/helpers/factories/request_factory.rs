use crate::engine::core::aggregate::GroupingSetSpec;
use crate::engine::query::AggregateRequest;

pub struct RequestFactory;

impl RequestFactory {
    pub fn rollup(dimensions: &[&str]) -> AggregateRequest {
        AggregateRequest::new(GroupingSetSpec::rollup(dimensions))
            .measure("price")
            .measure("rating")
    }

    pub fn cube(dimensions: &[&str]) -> AggregateRequest {
        AggregateRequest::new(GroupingSetSpec::cube(dimensions))
            .measure("price")
            .measure("rating")
    }

    pub fn group_by(dimensions: &[&str]) -> AggregateRequest {
        AggregateRequest::new(GroupingSetSpec::group_by(dimensions))
            .measure("price")
            .measure("rating")
    }
}
