//! Query registry
//!
//! The fixed set of queries the inventory runs, in orchestration order.
//! The aggregation engine treats the KQL as opaque text; only the labels
//! and ordering matter to the rest of the crate.

/// Rows requested per Resource Graph page, shared by all inventory queries
pub const PAGE_SIZE: usize = 1000;

/// One named query: `sheet` is the workbook section label
#[derive(Debug, Clone, Copy)]
pub struct QueryDef {
    pub key: &'static str,
    pub sheet: &'static str,
    pub kql: &'static str,
}

/// The six inventory queries, in the fixed collection order
pub const INVENTORY_QUERIES: &[QueryDef] = &[
    QueryDef {
        key: "apps",
        sheet: "Apps",
        kql: r#"resources
| where type =~ 'microsoft.web/sites'
| project name, resourceGroup, subscriptionId, location, kind,
    state = tostring(properties.state),
    defaultHostName = tostring(properties.defaultHostName),
    serverFarmId = tostring(properties.serverFarmId),
    httpsOnly = tobool(properties.httpsOnly),
    clientCertEnabled = tobool(properties.clientCertEnabled)
| order by name asc"#,
    },
    QueryDef {
        key: "plans",
        sheet: "App Service Plans",
        kql: r#"resources
| where type =~ 'microsoft.web/serverfarms'
| project name, resourceGroup, subscriptionId, location,
    skuName = tostring(sku.name),
    skuTier = tostring(sku.tier),
    capacity = toint(sku.capacity),
    kind,
    zoneRedundant = tobool(properties.zoneRedundant),
    maximumElasticWorkerCount = toint(properties.maximumElasticWorkerCount),
    numberOfSites = toint(properties.numberOfSites)
| order by name asc"#,
    },
    QueryDef {
        key: "autoscale",
        sheet: "Autoscale",
        kql: r#"resources
| where type =~ 'microsoft.insights/autoscalesettings'
| extend targetResourceId = tostring(properties.targetResourceUri)
| where targetResourceId contains 'microsoft.web/serverfarms'
| project name, resourceGroup, subscriptionId, location,
    enabled = tobool(properties.enabled),
    targetResourceId,
    profileCount = array_length(properties.profiles),
    minCapacity = tostring(properties.profiles[0].capacity.minimum),
    maxCapacity = tostring(properties.profiles[0].capacity.maximum),
    defaultCapacity = tostring(properties.profiles[0].capacity.['default'])
| order by name asc"#,
    },
    QueryDef {
        key: "stacks",
        sheet: "Runtime Stacks",
        kql: r#"resources
| where type =~ 'microsoft.web/sites'
| extend siteProps = parse_json(properties)
| project name, resourceGroup, subscriptionId, kind,
    linuxFxVersion = tostring(siteProps.siteConfig.linuxFxVersion),
    windowsFxVersion = tostring(siteProps.siteConfig.windowsFxVersion),
    netFrameworkVersion = tostring(siteProps.siteConfig.netFrameworkVersion),
    phpVersion = tostring(siteProps.siteConfig.phpVersion),
    pythonVersion = tostring(siteProps.siteConfig.pythonVersion),
    javaVersion = tostring(siteProps.siteConfig.javaVersion),
    nodeVersion = tostring(siteProps.siteConfig.nodeVersion)
| order by name asc"#,
    },
    QueryDef {
        key: "networking",
        sheet: "Networking",
        kql: r#"resources
| where type =~ 'microsoft.web/sites'
| project name, resourceGroup, subscriptionId,
    virtualNetworkSubnetId = tostring(properties.virtualNetworkSubnetId),
    publicNetworkAccess = tostring(properties.publicNetworkAccess),
    inboundIpAddress = tostring(properties.inboundIpAddress),
    outboundIpAddresses = tostring(properties.outboundIpAddresses),
    possibleOutboundIpAddresses = tostring(properties.possibleOutboundIpAddresses)
| order by name asc"#,
    },
    QueryDef {
        key: "domains",
        sheet: "Custom Domains",
        kql: r#"resources
| where type =~ 'microsoft.web/sites'
| mv-expand hostname = properties.hostNames
| extend hostname = tostring(hostname)
| where hostname !endswith 'azurewebsites.net'
| project siteName = name, resourceGroup, subscriptionId, hostname,
    httpsOnly = tobool(properties.httpsOnly)
| order by siteName asc"#,
    },
];

/// The four Log Analytics metrics queries, in the fixed collection order
pub const METRICS_QUERIES: &[QueryDef] = &[
    QueryDef {
        key: "response-time",
        sheet: "Response Time",
        kql: r#"AppServiceHTTPLogs
| where TimeGenerated > ago(7d)
| summarize avgTimeTakenMs = avg(TimeTaken),
    p95TimeTakenMs = percentile(TimeTaken, 95),
    requests = count()
    by CsHost
| order by avgTimeTakenMs desc"#,
    },
    QueryDef {
        key: "cpu-time",
        sheet: "CPU Time",
        kql: r#"AzureMetrics
| where TimeGenerated > ago(7d)
| where MetricName == 'CpuTime'
| summarize totalCpuSeconds = sum(Total) by Resource
| order by totalCpuSeconds desc"#,
    },
    QueryDef {
        key: "memory-working-set",
        sheet: "Memory Working Set",
        kql: r#"AzureMetrics
| where TimeGenerated > ago(7d)
| where MetricName == 'AverageMemoryWorkingSet'
| summarize avgWorkingSetMb = avg(Average) / (1024 * 1024) by Resource
| order by avgWorkingSetMb desc"#,
    },
    QueryDef {
        key: "plan-cpu-memory",
        sheet: "Plan CPU-Memory Pct",
        kql: r#"AzureMetrics
| where TimeGenerated > ago(7d)
| where MetricName in ('CpuPercentage', 'MemoryPercentage')
| summarize avgValue = avg(Average), maxValue = max(Maximum) by Resource, MetricName
| order by Resource asc, MetricName asc"#,
    },
];
