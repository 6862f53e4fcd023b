use super::domain::Candidate;

/// Order eligible candidates by descending rank key.
///
/// `sort_by` is stable, so runners sharing a key keep their card order.
pub fn rank_schema(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut schema = candidates;
    schema.sort_by(|left, right| right.rank_key().cmp(&left.rank_key()));
    schema
}
