//! Gap-based 1D clustering of weighted observations.

/// Observation on a line: `index` points back into the caller's slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Obs {
    pub index: usize,
    pub param: f32,
    pub strength: f32,
}

/// Sort by `param` and split wherever consecutive values are more than `eps`
/// apart. Clusters whose summed strength is below `min_strength` are dropped.
pub(crate) fn cluster_1d(mut obs: Vec<Obs>, eps: f32, min_strength: f32) -> Vec<Vec<Obs>> {
    obs.sort_by(|a, b| a.param.total_cmp(&b.param).then_with(|| a.index.cmp(&b.index)));
    let mut clusters: Vec<Vec<Obs>> = Vec::new();
    let mut cur: Vec<Obs> = Vec::new();
    for o in obs {
        let joins = cur
            .last()
            .map_or(true, |last| (o.param - last.param).abs() <= eps);
        if !joins {
            flush(&mut clusters, std::mem::take(&mut cur), min_strength);
        }
        cur.push(o);
    }
    flush(&mut clusters, cur, min_strength);
    clusters
}

fn flush(clusters: &mut Vec<Vec<Obs>>, cur: Vec<Obs>, min_strength: f32) {
    if cur.is_empty() {
        return;
    }
    let sum_w: f32 = cur.iter().map(|x| x.strength).sum();
    if sum_w >= min_strength {
        clusters.push(cur);
    }
}
