// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in sample diagrams.
//!
//! Both tables describe AWS CI/CD pipelines. The deploy pipeline is the
//! smaller one with artifact markers and deployment pulses; the secure
//! delivery pipeline is the larger security-focused walkthrough.

use crate::diagram::Diagram;
use crate::effect::PulseEffect;
use crate::geometry::Anchor;
use crate::path::{MarkerKind, PathSegment};
use crate::step::Step;
use std::time::Duration;

fn segment(from: (f32, f32), to: (f32, f32)) -> PathSegment {
    // Tuples are (left, top) to match how the paths are authored
    PathSegment::new(Anchor::new(from.1, from.0), Anchor::new(to.1, to.0))
}

/// Five-step deploy pipeline: source stages feeding beta and production
/// deployments, with deployment pulses on the two deploy steps.
pub fn aws_deploy_pipeline() -> Diagram {
    let steps = vec![
        Step::new(
            1,
            "Source Stage - CodeCommit",
            "Code is stored in a CodeCommit repository.",
            Anchor::new(35.0, 15.0),
            "The pipeline begins with source code stored in AWS CodeCommit, \
             a managed Git hosting service. It tracks every change, integrates \
             with the rest of the pipeline, and triggers an execution whenever \
             new code lands.",
        ),
        Step::new(
            2,
            "Source Stage - S3",
            "Deployment artifacts are stored in Amazon S3.",
            Anchor::new(65.0, 15.0),
            "Amazon S3 stores the deployment packages used throughout the \
             pipeline. Artifacts are versioned, durable, and handed to the \
             pipeline's deploy stages with access controls applied.",
        ),
        Step::new(
            3,
            "Deploy Stage - Beta",
            "CodeDeploy deploys the application to the beta fleet.",
            Anchor::new(50.0, 50.0),
            "AWS CodeDeploy automates the rollout to a fleet of EC2 instances \
             in the beta environment. Deployment health is monitored and a \
             rollback is available if issues are detected, so problems surface \
             before production.",
        ),
        Step::new(
            4,
            "Beta EC2 Fleet",
            "The application runs on beta EC2 instances.",
            Anchor::new(50.0, 65.0),
            "The beta fleet hosts the application in a production-like \
             environment. Functional validation and performance testing happen \
             here, acting as the staging area before the production rollout.",
        ),
        Step::new(
            5,
            "Deploy Stage - Production",
            "After successful testing, CodeDeploy deploys to production.",
            Anchor::new(50.0, 85.0),
            "Once beta testing passes, CodeDeploy rolls the application out to \
             the production fleet, keeping the deployment consistent across \
             instances and the application available throughout.",
        ),
    ];

    let segments = vec![
        // Source stages ship artifacts, not plain dots
        segment((15.0, 35.0), (30.0, 35.0)).with_marker(MarkerKind::Artifact),
        segment((15.0, 65.0), (30.0, 65.0)).with_marker(MarkerKind::Artifact),
        segment((30.0, 50.0), (50.0, 50.0)),
        segment((50.0, 50.0), (65.0, 50.0)),
        segment((65.0, 50.0), (85.0, 50.0)),
    ];

    let pulses = vec![
        // Beta and production deployments flash the receiving fleet
        PulseEffect::new(3, Duration::from_millis(1500), Anchor::new(50.0, 65.0)),
        PulseEffect::new(5, Duration::from_millis(1500), Anchor::new(50.0, 95.0)),
    ];

    Diagram::new("AWS Deploy Pipeline", steps, segments, pulses)
        .expect("built-in deploy pipeline is valid")
}

/// Ten-step secure delivery pipeline: static and dynamic security testing
/// around build, staging, approval, and production.
pub fn secure_delivery_pipeline() -> Diagram {
    let steps = vec![
        Step::new(
            1,
            "Developer Code Commit",
            "Developers push code to a Git repository.",
            Anchor::new(28.0, 14.0),
            "The pipeline begins with developers pushing code to a Git \
             repository. All changes are tracked, reviewed through pull \
             requests, and every push triggers the pipeline.",
        ),
        Step::new(
            2,
            "Static Code Analysis",
            "Code is analyzed for quality and security issues without execution.",
            Anchor::new(51.0, 31.0),
            "Static analysis tools inspect the code without running it, \
             flagging vulnerable dependencies, quality issues, and likely bugs \
             while the change is still cheap to fix.",
        ),
        Step::new(
            3,
            "CodeCommit to Static Analysis",
            "The code is handed to the static analysis tools for examination.",
            Anchor::new(42.0, 42.0),
            "The repository contents are scanned automatically; findings are \
             stored for review and tracked across runs.",
        ),
        Step::new(
            4,
            "Build and Test (SAST)",
            "CodeBuild compiles the code and runs tests, including SAST.",
            Anchor::new(37.0, 60.0),
            "AWS CodeBuild compiles the application, runs the unit tests, \
             performs static application security testing, and produces the \
             deployment artifacts and build reports.",
        ),
        Step::new(
            5,
            "Deploy to Staging",
            "The application is deployed to a staging environment.",
            Anchor::new(15.0, 79.0),
            "After a green build the application is deployed to the staging \
             environment, validating configuration in a production-like \
             setting before anything user-facing changes.",
        ),
        Step::new(
            6,
            "Dynamic Application Security Testing",
            "DAST tools probe the running application for vulnerabilities.",
            Anchor::new(37.0, 76.0),
            "Dynamic analysis tools exercise the running application, \
             simulating attacks to find weaknesses that never show up in the \
             source alone.",
        ),
        Step::new(
            7,
            "Test (DAST)",
            "Dynamic security testing runs against staging.",
            Anchor::new(37.0, 82.0),
            "Automated security tests run against the staging deployment, \
             covering authentication, authorization, and input handling at \
             runtime.",
        ),
        Step::new(
            8,
            "Manual Approval",
            "A human reviews the results before production.",
            Anchor::new(18.0, 43.0),
            "A manual gate lets the team review test output and security \
             findings and make the go/no-go call for production, satisfying \
             change management.",
        ),
        Step::new(
            9,
            "Deploy to Production",
            "After approval, the application is deployed to production.",
            Anchor::new(28.0, 97.0),
            "With approval granted, the application rolls out to production \
             with health monitoring and rollback available if anything \
             regresses.",
        ),
        Step::new(
            10,
            "CloudWatch Events",
            "CloudWatch monitors the pipeline and application.",
            Anchor::new(5.0, 48.0),
            "CloudWatch Events watches the whole pipeline, detecting failures \
             and anomalies and triggering notifications or automated \
             responses.",
        ),
    ];

    let segments = vec![
        segment((14.0, 28.0), (31.0, 28.0)),
        segment((31.0, 28.0), (31.0, 51.0)),
        segment((31.0, 28.0), (42.0, 42.0)),
        segment((42.0, 42.0), (60.0, 37.0)),
        segment((60.0, 37.0), (79.0, 15.0)),
        segment((79.0, 15.0), (76.0, 37.0)),
        segment((76.0, 37.0), (82.0, 37.0)),
        segment((82.0, 37.0), (43.0, 18.0)),
        segment((43.0, 18.0), (97.0, 28.0)),
        segment((31.0, 28.0), (48.0, 5.0)),
    ];

    Diagram::new("Secure Delivery Pipeline", steps, segments, vec![])
        .expect("built-in secure delivery pipeline is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepId;

    #[test]
    fn test_deploy_pipeline_shape() {
        let diagram = aws_deploy_pipeline();
        assert_eq!(diagram.step_count(), 5);
        assert_eq!(diagram.segment_count(), 5);
        assert_eq!(diagram.pulses_for(StepId::new(3)).count(), 1);
        assert_eq!(diagram.pulses_for(StepId::new(4)).count(), 0);
        assert_eq!(diagram.segment(0).unwrap().marker, MarkerKind::Artifact);
        assert_eq!(diagram.segment(2).unwrap().marker, MarkerKind::Dot);
    }

    #[test]
    fn test_secure_pipeline_shape() {
        let diagram = secure_delivery_pipeline();
        assert_eq!(diagram.step_count(), 10);
        assert_eq!(diagram.segment_count(), 10);
    }

    #[test]
    fn test_samples_round_trip() {
        let text = aws_deploy_pipeline().to_ron_string().unwrap();
        let parsed = Diagram::from_ron_str(&text).unwrap();
        assert_eq!(parsed.step_count(), 5);
    }
}
