//! Well-known Kubernetes keys written by controllers and server-side tooling.
//!
//! Values under these keys are owned by the cluster, not by the declared
//! configuration. The flatten side removes them so that they never show up as
//! drift, unless the same key is explicitly declared by the user.
use const_format::concatcp;

/// The well-known batch API key prefix.
const K8S_BATCH_KEY_PREFIX: &str = "batch.kubernetes.io/";

/// The well-known kubectl key prefix.
const K8S_KUBECTL_KEY_PREFIX: &str = "kubectl.kubernetes.io/";

/// The legacy controller uid label key `controller-uid`. The job controller
/// adds it to the pod template so that the pods a job creates can be selected.
pub const CONTROLLER_UID_LABEL_KEY: &str = "controller-uid";

/// The legacy job name label key `job-name`. The job controller adds it to the
/// pod template, mirroring the name of the owning job.
pub const JOB_NAME_LABEL_KEY: &str = "job-name";

/// The controller uid label key `batch.kubernetes.io/controller-uid`. Written
/// by the job controller since batch/v1 promoted the prefixed form; clusters
/// write it alongside the legacy [`CONTROLLER_UID_LABEL_KEY`].
pub const K8S_BATCH_CONTROLLER_UID_LABEL_KEY: &str =
    concatcp!(K8S_BATCH_KEY_PREFIX, "controller-uid");

/// The job name label key `batch.kubernetes.io/job-name`. Written by the job
/// controller alongside the legacy [`JOB_NAME_LABEL_KEY`].
pub const K8S_BATCH_JOB_NAME_LABEL_KEY: &str = concatcp!(K8S_BATCH_KEY_PREFIX, "job-name");

/// The kubectl last-applied-configuration annotation key
/// `kubectl.kubernetes.io/last-applied-configuration`. Written by client-side
/// apply and never part of the declared configuration.
pub const K8S_KUBECTL_LAST_APPLIED_CONFIGURATION_ANNOTATION_KEY: &str =
    concatcp!(K8S_KUBECTL_KEY_PREFIX, "last-applied-configuration");

/// All label keys the job controller writes into the pod template of a job.
pub const JOB_CONTROLLER_LABEL_KEYS: &[&str] = &[
    CONTROLLER_UID_LABEL_KEY,
    JOB_NAME_LABEL_KEY,
    K8S_BATCH_CONTROLLER_UID_LABEL_KEY,
    K8S_BATCH_JOB_NAME_LABEL_KEY,
];

/// All annotation keys written by server-side machinery rather than by users.
pub const INTERNAL_ANNOTATION_KEYS: &[&str] =
    &[K8S_KUBECTL_LAST_APPLIED_CONFIGURATION_ANNOTATION_KEY];
