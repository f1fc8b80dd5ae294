// Application layer: concrete pipelines assembled from domain ports.

pub mod pipelines;
