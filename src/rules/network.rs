use crate::core::{Finding, Resource};
use crate::rules::Rule;

const HTTPS_PORT: i64 = 443;
const SSH_PORT: i64 = 22;
const RDP_PORT: i64 = 3389;

const NSG_GUIDE: &str = "https://learn.microsoft.com/en-us/azure/virtual-network/manage-network-security-group?tabs=network-security-group-portal";
const BASTION_GUIDE: &str = "https://learn.microsoft.com/en-us/azure/bastion/quickstart-host-portal";
const APP_GATEWAY_GUIDE: &str =
    "https://learn.microsoft.com/en-us/azure/application-gateway/create-multiple-sites-portal";

/// Flags exposed ports. 443 is the only port that passes silently; SSH and
/// RDP are known but still reported as remote administration exposure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkRule;

impl Rule for NetworkRule {
    fn id(&self) -> &'static str {
        "network"
    }

    fn title(&self) -> &'static str {
        "Network exposure"
    }

    fn assess(&self, resource: &Resource) -> Vec<Finding> {
        let mut out = Vec::new();
        for port in resource.ports() {
            if !matches!(port, HTTPS_PORT | SSH_PORT | RDP_PORT) {
                out.push(insecure_port(port));
            }
            if port == SSH_PORT {
                out.push(remote_admin_port("SSH", SSH_PORT));
            }
            if port == RDP_PORT {
                out.push(remote_admin_port("RDP", RDP_PORT));
            }
        }
        out
    }
}

fn insecure_port(port: i64) -> Finding {
    Finding::new(
        "Insecure port detected.",
        format!(
            "Insecure port detected. Port is: {port}. All web traffic should be over 443 and using a secure protocol (HTTPS). Use an NSG or service specific equivalents in the case of PaaS. Additionally, consider only exposing services via Application Gateway with WAF enabled."
        ),
        format!(
            "Please refer to the following for additional guidance on how to create an NSG and rule: {NSG_GUIDE} and here for guidance on how to setup Application Gateway: {APP_GATEWAY_GUIDE}."
        ),
    )
}

fn remote_admin_port(protocol: &str, port: i64) -> Finding {
    Finding::new(
        format!("{protocol} port ({port}) detected."),
        format!(
            "{protocol} port detected. Remote administration ports should not be exposed to the internet. Azure Bastion should be leveraged to securely administer your services."
        ),
        format!(
            "Please refer to the following for additional guidance on how to create an NSG and rule: {NSG_GUIDE} and here for guidance on how to setup Azure Bastion: {BASTION_GUIDE}."
        ),
    )
}
