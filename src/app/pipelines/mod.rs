pub mod interview_pipeline;
