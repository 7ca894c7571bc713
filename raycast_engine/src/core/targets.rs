use crate::tracing_targets;

tracing_targets! {
    SCENE = "scene",
    BVH = "bvh",
    DISPATCH = "dispatch",
}
