use crate::models::CandidateUrl;

/// Replace the first value of `param_name` with `replacement`, inserted as-is.
///
/// Every other pair keeps its original raw text and position. Returns `None`
/// when the parameter does not occur in the query. A replacement containing
/// `&` adds a pair to the probe's query; `#` is percent-encoded as `%23`.
pub fn substitute_first_value(
    candidate: &CandidateUrl,
    param_name: &str,
    replacement: &str,
) -> Option<String> {
    let mut replaced = false;
    let pairs: Vec<String> = candidate
        .segments()
        .iter()
        .map(|segment| {
            if !replaced && segment.name == param_name {
                replaced = true;
                format!("{}={}", segment.raw_name, replacement)
            } else {
                segment.to_raw()
            }
        })
        .collect();

    if !replaced {
        return None;
    }

    let mut url = candidate.url().clone();
    url.set_query(Some(&pairs.join("&")));
    Some(url.to_string())
}
